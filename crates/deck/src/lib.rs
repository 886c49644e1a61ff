//! Deck - idea capture and classification service
//!
//! A chat-style assistant that turns unstructured text (typed, voice,
//! or SMS) into structured post-idea records, with a REST surface for
//! browsing and editing the resulting deck.

pub mod cli;
pub mod server;
