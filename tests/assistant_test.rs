//! チャットアシスタントのテスト（LLMなし）
//!
//! LLMが未設定の場合のローカル応答を検証

use car_lookup::assistant::{Assistant, ReplySource};
use car_lookup_common::prompts::CONTACT_NOTICE;
use car_lookup_common::{MatchType, Roster, DEFAULT_PLATE_FIELD};

const ROSTER_CSV: &str = "First Name,Last Name,Member,Car Type,Car Manufacturer,Plate Number
John,Smith,Y,Sedan,Jaguar,ABC-1234
Mary,Thomas,N,SUV,Honda,XYZ-987
";

fn assistant() -> Assistant {
    let engine = Roster::from_csv_str(ROSTER_CSV, DEFAULT_PLATE_FIELD)
        .unwrap()
        .into_engine(Default::default());
    Assistant::new(engine, None, "SJIOC")
}

#[tokio::test]
async fn test_local_vehicle_card() {
    let assistant = assistant();
    assert!(!assistant.has_llm());

    let reply = assistant.answer("Whose car is ABC-1234?").await;
    assert_eq!(reply.source, ReplySource::Local);
    assert!(reply.text.contains("John Sm***"));
    assert!(reply.text.contains("Jaguar Sedan"));
    assert!(!reply.text.contains("Smith"));
    assert!(reply.text.ends_with(CONTACT_NOTICE));

    let matched = reply.matched.unwrap();
    assert_eq!(matched.match_type, MatchType::Exact);
}

#[tokio::test]
async fn test_bare_plate_message() {
    let reply = assistant().answer("xyz 987").await;
    let matched = reply.matched.expect("plate should resolve");
    assert_eq!(matched.match_type, MatchType::Normalized);
    assert_eq!(matched.view.display_name, "Mary Th****");
    assert!(reply.text.contains("Non-Member"));
}

#[tokio::test]
async fn test_fuzzy_match_mentions_confidence() {
    let reply = assistant().answer("who owns ABD1234").await;
    let matched = reply.matched.expect("plate should resolve");
    assert_eq!(matched.match_type, MatchType::Fuzzy);
    assert!(reply.text.contains("86% confidence"));
}

#[tokio::test]
async fn test_unknown_plate() {
    let reply = assistant().answer("QQQ-0000").await;
    assert!(reply.matched.is_none());
    assert!(reply.text.contains("QQQ-0000"));
    assert!(reply.text.contains("don't have information"));
}

#[tokio::test]
async fn test_bulk_request_is_refused() {
    let assistant = assistant();
    for message in ["list all Jaguar cars", "show all members", "who drives a honda"] {
        let reply = assistant.answer(message).await;
        assert!(reply.matched.is_none());
        assert!(reply.text.contains("Privacy Protection"), "message {:?}", message);
        assert!(!reply.text.contains("John"));
    }
}

#[tokio::test]
async fn test_greeting_and_help() {
    let assistant = assistant();
    assert!(assistant.answer("hello").await.text.contains("Welcome"));
    assert!(assistant.answer("help").await.text.contains("I can help you with"));
}

#[tokio::test]
async fn test_longer_plate_does_not_resolve_to_embedded_plate() {
    let engine = Roster::from_csv_str(
        "First Name,Last Name,Member,Car Type,Car Manufacturer,Plate Number\nJohn,Smith,Y,Sedan,Jaguar,AB-1234\n",
        DEFAULT_PLATE_FIELD,
    )
    .unwrap()
    .into_engine(Default::default());
    let assistant = Assistant::new(engine, None, "SJIOC");

    let reply = assistant.answer("whose car is GJ-01-AB-1234?").await;
    assert!(reply.matched.is_none());
    assert!(reply.text.contains("GJ-01-AB-1234"));
    assert!(!reply.text.contains("John"));
}
