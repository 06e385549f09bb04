// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod aggregator;
pub mod day_key;
pub mod feed;
pub mod identity;
pub mod leaderboard;
pub mod ranker;

pub use aggregator::aggregate;
pub use day_key::normalize;
pub use feed::{FeedClient, FeedError};
pub use leaderboard::{build_leaderboard, build_member_board};
pub use ranker::{rank, Rankable};
