use anyhow::Result;

use lessonbot_core::{HealthStatus, LessonPlanApi};

fn format_health(base_url: &str, health: &HealthStatus) -> String {
    format!(
        "Backend: {base_url}\nStatus:  {}\nMessage: {}",
        health.status, health.message
    )
}

/// Execute `lessonbot health`.
pub async fn run_health(api: &dyn LessonPlanApi, base_url: &str) -> Result<()> {
    let health = api.check_health().await?;
    println!("{}", format_health(base_url, &health));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use lessonbot_core::{ClientConfig, HttpLessonPlanClient};
    use lessonbot_test_utils::{MockBackend, MockReply, unreachable_base_url};

    #[test]
    fn health_output_lists_status_and_message() {
        let health = HealthStatus {
            status: "healthy".into(),
            message: "ok".into(),
        };
        assert_eq!(
            format_health("http://localhost:8000/", &health),
            "Backend: http://localhost:8000/\nStatus:  healthy\nMessage: ok"
        );
    }

    #[tokio::test]
    async fn run_health_succeeds_against_healthy_backend() {
        let backend = MockBackend::start(MockReply::raw(500, "")).await;
        let client = HttpLessonPlanClient::new(ClientConfig::new(&backend.base_url)).unwrap();
        run_health(&client, &backend.base_url).await.unwrap();
    }

    #[tokio::test]
    async fn run_health_reports_unresponsive_backend() {
        let url = unreachable_base_url();
        let client = HttpLessonPlanClient::new(ClientConfig::new(&url)).unwrap();
        let err = run_health(&client, &url).await.unwrap_err();
        assert_eq!(err.to_string(), "Backend server is not responding");
    }
}
