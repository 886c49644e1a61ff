//! Service integrations and the agent flow
//!
//! Everything that talks to the outside world lives here: the LLM
//! provider, the TextBelt SMS gateway, ffmpeg transcoding, and document
//! text extraction. The agent module composes them into the
//! classification flow shared by `/agent` and `/sms-webhook`.

pub mod agent;
pub mod extract;
pub mod llm;
pub mod sms;
pub mod transcode;
