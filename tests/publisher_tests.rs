//! End-to-end behaviour of the publish pipeline through the public API.

mod test_utils;

use gelf_publisher::{
    DeliveryOutcome, GELF_PROTOCOL_VERSION, GelfHttpPublisher, GelfLevel, GelfMessage,
    PublishError, PublisherBuilder, ValidationError,
};
use proptest::prelude::*;
use rstest::{fixture, rstest};
use serde_json::json;

use test_utils::{Reply, ScriptedTransport};

fn publisher_with(transport: ScriptedTransport) -> GelfHttpPublisher<ScriptedTransport> {
    PublisherBuilder::new()
        .with_hostname("graylog")
        .build_with_transport(transport)
        .expect("build")
}

#[fixture]
fn message() -> GelfMessage {
    GelfMessage::new("h", "m").with_level(GelfLevel::Error)
}

#[rstest]
fn round_trip_payload(mut message: GelfMessage) {
    let transport = ScriptedTransport::always(Reply::Status(200));
    let mut publisher = publisher_with(transport.clone());

    assert!(publisher.publish(&mut message).expect("publish"));

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].url, "http://graylog:12201/gelf");
    assert_eq!(
        sent[0].body,
        json!({"host": "h", "short_message": "m", "level": 3, "version": GELF_PROTOCOL_VERSION})
    );
    assert_eq!(sent[0].header("Content-Type"), Some("application/json"));
}

#[rstest]
fn caller_version_is_overridden(mut message: GelfMessage) {
    message.set_version("2.0");
    let transport = ScriptedTransport::always(Reply::Status(200));
    let mut publisher = publisher_with(transport.clone());

    publisher.publish(&mut message).expect("publish");
    assert_eq!(transport.sent()[0].body["version"], GELF_PROTOCOL_VERSION);
}

#[rstest]
#[case(Reply::Status(200), true, None, None)]
#[case(Reply::Status(500), false, None, Some(500))]
#[case(Reply::Status(404), false, None, Some(404))]
#[case(Reply::Fail("dns lookup failed"), false, Some("dns lookup failed"), None)]
fn outcome_accessors(
    mut message: GelfMessage,
    #[case] reply: Reply,
    #[case] delivered: bool,
    #[case] transport_error: Option<&str>,
    #[case] http_error: Option<u16>,
) {
    let mut publisher = publisher_with(ScriptedTransport::always(reply));
    assert_eq!(publisher.publish(&mut message).expect("publish"), delivered);
    assert_eq!(publisher.transport_error(), transport_error);
    assert_eq!(publisher.http_error(), http_error);
}

#[rstest]
fn error_state_tracks_latest_attempt(mut message: GelfMessage) {
    let transport = ScriptedTransport::new([
        Reply::Fail("connection reset"),
        Reply::Status(502),
        Reply::Status(200),
    ]);
    let mut publisher = publisher_with(transport);

    assert!(!publisher.publish(&mut message).expect("first"));
    assert_eq!(publisher.transport_error(), Some("connection reset"));
    assert_eq!(publisher.http_error(), None);

    assert!(!publisher.publish(&mut message).expect("second"));
    assert_eq!(publisher.transport_error(), None);
    assert_eq!(publisher.http_error(), Some(502));

    assert!(publisher.publish(&mut message).expect("third"));
    assert_eq!(publisher.last_outcome(), Some(&DeliveryOutcome::Success));
}

#[rstest]
fn repeated_publishes_share_one_destination(mut message: GelfMessage) {
    let transport = ScriptedTransport::always(Reply::Status(200));
    let mut publisher = publisher_with(transport.clone());

    assert!(publisher.publish(&mut message).expect("first"));
    assert!(publisher.publish(&mut message).expect("second"));

    let urls: Vec<_> = transport.sent().into_iter().map(|r| r.url).collect();
    assert_eq!(urls, vec![publisher.url().to_owned(); 2]);
}

#[test]
fn missing_host_is_rejected_before_io() {
    let transport = ScriptedTransport::always(Reply::Status(200));
    let mut publisher = publisher_with(transport.clone());
    let mut message = GelfMessage::default();
    message.set_short_message("m");

    let err = publisher.publish(&mut message).expect_err("invalid");
    assert!(matches!(
        err,
        PublishError::Validation(ValidationError::MissingField("host"))
    ));
    assert_eq!(transport.calls(), 0);
    assert_eq!(message.version(), None);
}

#[rstest]
#[case(" ", "  ")]
#[case("0", "0")]
#[case("web-1", "\t")]
fn unusual_but_non_empty_fields_are_published(#[case] host: &str, #[case] short_message: &str) {
    let transport = ScriptedTransport::always(Reply::Status(200));
    let mut publisher = publisher_with(transport.clone());
    let mut message = GelfMessage::new(host, short_message);

    assert!(publisher.publish(&mut message).expect("publish"));
    assert_eq!(transport.calls(), 1);
    let body = &transport.sent()[0].body;
    assert_eq!(body["host"], host);
    assert_eq!(body["short_message"], short_message);
}

fn optional_text() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None::<String>),
        Just(Some(String::new())),
        "[ \t\n]{1,4}".prop_map(Some),
        "[0-9]{1,3}".prop_map(Some),
        "[a-z ]{1,12}".prop_map(Some),
    ]
}

proptest! {
    #[test]
    fn only_complete_messages_reach_the_transport(
        host in optional_text(),
        short_message in optional_text(),
    ) {
        let transport = ScriptedTransport::always(Reply::Status(200));
        let mut publisher = publisher_with(transport.clone());
        let mut message = GelfMessage::default();
        if let Some(host) = &host {
            message.set_host(host.clone());
        }
        if let Some(short_message) = &short_message {
            message.set_short_message(short_message.clone());
        }

        let complete = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        let result = publisher.publish(&mut message);
        if complete(&host) && complete(&short_message) {
            prop_assert!(result.expect("publish"));
            prop_assert_eq!(transport.calls(), 1);
            prop_assert_eq!(message.version(), Some(GELF_PROTOCOL_VERSION));
        } else {
            prop_assert!(matches!(result, Err(PublishError::Validation(_))));
            prop_assert_eq!(transport.calls(), 0);
        }
    }
}
