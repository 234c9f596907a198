use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use travel_genie::connector::api::controller::PlanController;
use travel_genie::{
    Container, ContainerConfig, MockTextGenerator, OutputFormat, ProviderKind, RequestArgs,
    CANCELLED_MESSAGE, FAILED_MESSAGE, TIMED_OUT_MESSAGE,
};

fn container(generator: MockTextGenerator, timeout_ms: i64) -> Container {
    let config = ContainerConfig {
        provider: ProviderKind::Mock,
        timeout_ms,
        ..ContainerConfig::default()
    };
    Container::with_generator(config, Arc::new(generator))
}

fn args() -> RequestArgs {
    RequestArgs {
        origin: Some("Delhi".into()),
        destination: Some("Kyoto".into()),
        start: NaiveDate::from_ymd_opt(2099, 3, 1),
        end: NaiveDate::from_ymd_opt(2099, 3, 6),
        budget: Some(3_000.0),
        travelers: Some(1),
        interests: vec!["Temples".into()],
        currency: Some("usd".into()),
        ..RequestArgs::default()
    }
}

fn never_abort() -> std::future::Pending<()> {
    std::future::pending()
}

#[tokio::test(start_paused = true)]
async fn text_output_has_header_and_plan() {
    let container = container(
        MockTextGenerator::replying("## Itinerary\nDay 1").with_delay(Duration::from_millis(200)),
        5_000,
    );
    let controller = PlanController::new(&container);

    let output = controller
        .plan(args(), OutputFormat::Text, never_abort())
        .await
        .unwrap();

    assert!(output.starts_with("Travel plan: Delhi -> Kyoto (2099-03-01 to 2099-03-06, 1 traveler, budget $3000 USD)"));
    assert!(output.contains("\nInterests: Temples\n"));
    assert!(output.ends_with("## Itinerary\nDay 1"));
}

#[tokio::test(start_paused = true)]
async fn header_lists_normalized_interests_or_placeholder() {
    let container = container(MockTextGenerator::replying("PLAN"), 5_000);
    let controller = PlanController::new(&container);

    let tagged = RequestArgs {
        interests: vec!["Food".into(), "food ".into(), "Art".into()],
        ..args()
    };
    let output = controller
        .plan(tagged, OutputFormat::Text, never_abort())
        .await
        .unwrap();
    assert!(output.contains("\nInterests: Food, Art\n"));

    let untagged = RequestArgs {
        interests: Vec::new(),
        ..args()
    };
    let output = controller
        .plan(untagged, OutputFormat::Text, never_abort())
        .await
        .unwrap();
    assert!(output.contains("\nInterests: No specific interests\n"));
}

#[tokio::test(start_paused = true)]
async fn abort_reports_cancellation_as_info() {
    let container = container(MockTextGenerator::never(), 60_000);
    let controller = PlanController::new(&container);

    let abort = tokio::time::sleep(Duration::from_millis(500));
    let output = controller
        .plan(args(), OutputFormat::Text, abort)
        .await
        .unwrap();

    assert_eq!(output, CANCELLED_MESSAGE);
}

#[tokio::test(start_paused = true)]
async fn timeout_is_an_error_in_text_mode() {
    let container = container(MockTextGenerator::never(), 1_000);
    let controller = PlanController::new(&container);

    let err = controller
        .plan(args(), OutputFormat::Text, never_abort())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), TIMED_OUT_MESSAGE);
}

#[tokio::test(start_paused = true)]
async fn json_failure_hides_provider_detail() {
    let container = container(MockTextGenerator::failing("api key revoked"), 5_000);
    let controller = PlanController::new(&container);

    let output = controller
        .plan(args(), OutputFormat::Json, never_abort())
        .await
        .unwrap();

    let report: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(report["status"], "failed");
    assert_eq!(report["message"], FAILED_MESSAGE);
    assert_eq!(report["request"]["destination"], "Kyoto");
    assert!(report.get("plan").is_none());
    assert!(!output.contains("api key revoked"));
}

#[tokio::test(start_paused = true)]
async fn json_success_carries_plan() {
    let container = container(MockTextGenerator::replying("PLAN"), 5_000);
    let controller = PlanController::new(&container);

    let output = controller
        .plan(args(), OutputFormat::Json, never_abort())
        .await
        .unwrap();

    let report: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(report["status"], "success");
    assert_eq!(report["plan"], "PLAN");
    assert!(report.get("message").is_none());
}

#[tokio::test(start_paused = true)]
async fn invalid_request_never_reaches_provider() {
    let generator = Arc::new(MockTextGenerator::replying("PLAN"));
    let config = ContainerConfig {
        provider: ProviderKind::Mock,
        ..ContainerConfig::default()
    };
    let container = Container::with_generator(config, generator.clone());
    let controller = PlanController::new(&container);

    let bad = RequestArgs {
        budget: Some(0.0),
        end: NaiveDate::from_ymd_opt(2099, 2, 1),
        ..args()
    };
    let err = controller
        .plan(bad, OutputFormat::Text, never_abort())
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("budget"), "{message}");
    assert!(message.contains("end_date"), "{message}");
    assert_eq!(generator.call_count(), 0);
}
