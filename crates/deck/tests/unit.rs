#[cfg(test)]
mod idea_store_tests {
  use anyhow::Result;
  use deck::server::models::idea::{self, IdeaPatch};
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
  async fn test_create_and_list_newest_first() -> Result<()> {
    let _temp = setup_temp_root();

    let first = idea::create("First idea").await?;
    let second = idea::create("Second idea").await?;

    let ideas = idea::all().await?;
    assert_eq!(ideas.len(), 2);
    assert_eq!(ideas[0].id, second.id);
    assert_eq!(ideas[1].id, first.id);
    assert_eq!(ideas[0].hook, "Second idea");
    assert_eq!(ideas[0].original, "Second idea");
    assert_eq!(ideas[0].status, "New");
    assert!(!ideas[0].used);

    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn test_mark_used_round_trips() -> Result<()> {
    let _temp = setup_temp_root();

    let idea = idea::create("Use me").await?;
    let updated = idea::mark_used(&idea.id).await?;
    assert!(updated.used);

    let ideas = idea::all().await?;
    assert!(ideas[0].used);

    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn test_mark_used_unknown_id_fails() {
    let _temp = setup_temp_root();

    let result = idea::mark_used("no-such-id").await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("not found"));
  }

  #[tokio::test]
  #[serial]
  async fn test_patch_touches_only_given_fields() -> Result<()> {
    let _temp = setup_temp_root();

    let idea = idea::create("Patch me").await?;
    let patch = IdeaPatch {
      topic: Some("AI".to_string()),
      status: Some("Drafted".to_string()),
      ..Default::default()
    };

    let updated = idea::update(&idea.id, &patch).await?;
    assert_eq!(updated.topic, "AI");
    assert_eq!(updated.status, "Drafted");
    assert_eq!(updated.post_type, "");
    assert_eq!(updated.hook, "Patch me");

    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn test_remove_returns_the_deleted_record() -> Result<()> {
    let _temp = setup_temp_root();

    let keep = idea::create("Keeper").await?;
    let goner = idea::create("Goner").await?;

    let removed = idea::remove(&goner.id).await?;
    assert_eq!(removed.hook, "Goner");

    let ideas = idea::all().await?;
    assert_eq!(ideas.len(), 1);
    assert_eq!(ideas[0].id, keep.id);

    assert!(idea::remove(&goner.id).await.is_err());

    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn test_clear_reports_count_and_leaves_valid_document() -> Result<()> {
    let _temp = setup_temp_root();

    idea::create("one").await?;
    idea::create("two").await?;

    assert_eq!(idea::clear().await?, 2);
    assert!(idea::all().await?.is_empty());
    assert_eq!(idea::clear().await?, 0);

    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn test_set_image_records_url() -> Result<()> {
    let _temp = setup_temp_root();

    let idea_record = idea::create("Picture this").await?;
    let updated = idea::set_image(&idea_record.id, "/uploads/abc.png").await?;
    assert_eq!(updated.image_url.as_deref(), Some("/uploads/abc.png"));

    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn test_wire_format_stays_camel_case() -> Result<()> {
    let _temp = setup_temp_root();

    let idea_record = idea::create("Wire check").await?;
    idea::update(&idea_record.id, &IdeaPatch { post_type: Some("Story".to_string()), ..Default::default() })
      .await?;
    idea::set_image(&idea_record.id, "/uploads/x.png").await?;

    let raw = std::fs::read_to_string(deck::server::config::ideas_path()?)?;
    assert!(raw.contains("\"createdAt\""));
    assert!(raw.contains("\"imageUrl\""));
    assert!(raw.contains("\"type\": \"Story\""));
    assert!(!raw.contains("post_type"));

    Ok(())
  }
}

#[cfg(test)]
mod chat_store_tests {
  use anyhow::Result;
  use chrono::{Duration, Utc};
  use deck::server::models::message::{self, ChatMessage, SENDER_AGENT, SENDER_USER};
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
  async fn test_append_preserves_arrival_order() -> Result<()> {
    let _temp = setup_temp_root();

    message::append(ChatMessage::new(SENDER_USER, "hello", Utc::now())).await?;
    message::append(ChatMessage::new(SENDER_AGENT, "hi there", Utc::now())).await?;

    let history = message::history().await?;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].text, "hello");
    assert_eq!(history[1].sender, SENDER_AGENT);

    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn test_reply_lands_strictly_after_latest_message() -> Result<()> {
    let _temp = setup_temp_root();

    // A client-supplied timestamp in the future must not reorder the reply
    let ahead = Utc::now() + Duration::seconds(60);
    message::append(ChatMessage::new(SENDER_USER, "from the future", ahead)).await?;

    let reply = message::append_reply("noted").await?;
    assert!(reply.created_at > ahead);

    let history = message::history().await?;
    assert_eq!(history.last().unwrap().text, "noted");

    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn test_edit_replaces_body_only() -> Result<()> {
    let _temp = setup_temp_root();

    let original = message::append(ChatMessage::new(SENDER_USER, "typo'd", Utc::now())).await?;
    let edited = message::edit_text(&original.id, "fixed").await?;

    assert_eq!(edited.id, original.id);
    assert_eq!(edited.text, "fixed");
    assert_eq!(edited.created_at, original.created_at);

    assert!(message::edit_text("missing-id", "nope").await.is_err());

    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn test_optional_fields_persist_verbatim() -> Result<()> {
    let _temp = setup_temp_root();

    let mut gif_message = ChatMessage::new(SENDER_AGENT, "celebrate", Utc::now());
    gif_message.kind = Some("celebration".to_string());
    gif_message.gif = Some("https://example.com/party.gif".to_string());
    message::append(gif_message).await?;

    let history = message::history().await?;
    assert_eq!(history[0].kind.as_deref(), Some("celebration"));
    assert_eq!(history[0].gif.as_deref(), Some("https://example.com/party.gif"));

    Ok(())
  }
}

#[cfg(test)]
mod tags_store_tests {
  use anyhow::Result;
  use deck::server::models::tags::{self, Tags};
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
  async fn test_unsaved_tags_read_as_defaults() -> Result<()> {
    let _temp = setup_temp_root();

    let tags = tags::load().await?;
    assert_eq!(tags, Tags::default());
    assert_eq!(tags.discipline, "");

    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn test_tags_round_trip() -> Result<()> {
    let _temp = setup_temp_root();

    let saved = Tags {
      discipline: "web design".to_string(),
      market: "startups".to_string(),
      customer_profile: "founders".to_string(),
      topic_pillars: "AI, branding".to_string(),
    };
    tags::save(&saved).await?;

    let loaded = tags::load().await?;
    assert_eq!(loaded, saved);

    // Wire format stays camelCase
    let raw = std::fs::read_to_string(deck::server::config::tags_path()?)?;
    assert!(raw.contains("customerProfile"));
    assert!(raw.contains("topicPillars"));

    Ok(())
  }
}
