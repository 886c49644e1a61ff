//! End-to-end tests of the agent flow against a scripted LLM

#[cfg(test)]
mod agent_flow_tests {
  use anyhow::Result;
  use chrono::Utc;
  use deck::server::models::message::{self, ChatMessage, SENDER_USER};
  use deck::server::models::idea;
  use deck::server::services::agent;
  use deck::server::services::llm::ScriptedChat;
  use serial_test::serial;
  use std::env;
  use tempfile::TempDir;

  fn setup_temp_root() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    env::set_var("DECK_ROOT", temp_dir.path());
    temp_dir
  }

  #[tokio::test]
  #[serial]
  async fn test_idea_dump_is_imported_and_announced() -> Result<()> {
    let _temp = setup_temp_root();

    let extraction = r#"[
      {"text": "Ship early, ship often", "type": "Opinion", "topic": "Productivity", "intent": "Inspire", "audience": "Peers"},
      {"text": "A long rambling multi-sentence brain dump. It goes on. And on and on about hiring."}
    ]"#;
    let llm = ScriptedChat::new([extraction, "Hiring well is your best marketing."]);

    let reply = agent::respond(&llm, "ideas: shipping, hiring").await?;

    assert!(reply.starts_with("Imported 2 new ideas!"));
    assert!(reply.contains("• Ship early, ship often"));
    assert!(reply.contains("• Hiring well is your best marketing."));

    // Ideas land at the front of the deck with their classification
    let ideas = idea::all().await?;
    assert_eq!(ideas.len(), 2);
    assert_eq!(ideas[0].hook, "Ship early, ship often");
    assert_eq!(ideas[0].post_type, "Opinion");
    assert_eq!(ideas[0].topic, "Productivity");
    assert_eq!(ideas[0].status, "New");
    assert_eq!(ideas[1].hook, "Hiring well is your best marketing.");
    assert!(ideas[1].original.contains("rambling"));

    // The announcement is mirrored into chat as an agent message
    let history = message::history().await?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].sender, "agent");
    assert!(history[0].text.starts_with("Imported 2 new ideas!"));

    // Only the long idea triggered a rewrite round trip
    let calls = llm.calls().await;
    assert_eq!(calls.len(), 2);
    assert!(calls[1].user.contains("rewrite it as a single, catchy sentence"));

    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn test_array_buried_in_prose_still_imports() -> Result<()> {
    let _temp = setup_temp_root();

    let extraction = "Here you go!\n[{\"text\": \"Lead with questions\"}]\nHave fun.";
    let llm = ScriptedChat::new([extraction]);

    let reply = agent::respond(&llm, "one idea").await?;
    assert!(reply.contains("Imported 1 new ideas!"));

    let ideas = idea::all().await?;
    assert_eq!(ideas.len(), 1);
    assert_eq!(ideas[0].hook, "Lead with questions");

    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn test_conversational_reply_uses_history_context() -> Result<()> {
    let _temp = setup_temp_root();

    message::append(ChatMessage::new(SENDER_USER, "I posted the launch story", Utc::now())).await?;

    let llm = ScriptedChat::new(["Happy to help! What's next?", "Nice - want ideas for a follow-up?"]);
    let reply = agent::respond(&llm, "what should I do next?").await?;

    assert_eq!(reply, "Nice - want ideas for a follow-up?");

    // No ideas were created
    assert!(idea::all().await?.is_empty());

    // The reply was appended after the user's message
    let history = message::history().await?;
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].sender, "agent");
    assert!(history[1].created_at > history[0].created_at);

    // The conversational prompt carried the transcript
    let calls = llm.calls().await;
    assert_eq!(calls.len(), 2);
    assert!(calls[1].user.contains("User: I posted the launch story"));
    assert!(calls[1].user.contains("User: what should I do next?"));

    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn test_llm_failure_surfaces_without_partial_writes() -> Result<()> {
    let _temp = setup_temp_root();

    // Script exhausted immediately: the extraction call itself fails
    let llm = ScriptedChat::new(Vec::<String>::new());
    let result = agent::respond(&llm, "anything").await;

    assert!(result.is_err());
    assert!(idea::all().await?.is_empty());
    assert!(message::history().await?.is_empty());

    Ok(())
  }
}
