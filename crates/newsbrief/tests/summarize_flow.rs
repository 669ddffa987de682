use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use newsbrief::models::summary::{Citation, Summary, SummaryOutcome};
use newsbrief::news::{NewsApiClient, NewsApiConfig};
use newsbrief::orchestrator::{Orchestrator, Session};
use newsbrief::platform::configs::PlatformConfig;
use newsbrief::platform::openai::OpenAiAssistantClient;

fn run_body(status: &str) -> serde_json::Value {
    json!({
        "id": "run_e2e",
        "thread_id": "thread_e2e",
        "assistant_id": "asst_e2e",
        "status": status,
    })
}

/// Full offline pass over both wires: the platform pauses the run on a
/// `get_news` call for "space", the news API returns two articles (one
/// extractable, one dead link), and the final reply carries two citations.
#[tokio::test]
async fn test_summarize_topic_end_to_end() {
    let platform = MockServer::start().await;
    let news = MockServer::start().await;

    // News search plus the two article pages behind it.
    let article_text = "y".repeat(2500);
    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "space"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "articles": [
                {
                    "title": "Orbital launch succeeds",
                    "source": {"name": "BBC"},
                    "description": "A good day for rockets",
                    "url": format!("{}/article-ok", news.uri()),
                },
                {
                    "title": "Second launch scrubbed",
                    "source": {"name": "Reuters"},
                    "description": null,
                    "url": format!("{}/article-missing", news.uri()),
                }
            ]
        })))
        .expect(1)
        .mount(&news)
        .await;
    Mock::given(method("GET"))
        .and(path("/article-ok"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<html><body><article><p>{}</p></article></body></html>",
            article_text
        )))
        .mount(&news)
        .await;
    Mock::given(method("GET"))
        .and(path("/article-missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&news)
        .await;

    // Assistant platform lifecycle.
    Mock::given(method("POST"))
        .and(path("/v1/assistants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "asst_e2e",
            "name": "News Assistant",
            "model": "gpt-3.5-turbo",
        })))
        .expect(1)
        .mount(&platform)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/threads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "thread_e2e"})))
        .expect(1)
        .mount(&platform)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/threads/thread_e2e/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "msg_user"})))
        .expect(2) // format instructions, then the topic request
        .mount(&platform)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/threads/thread_e2e/runs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body("queued")))
        .expect(1)
        .mount(&platform)
        .await;

    // First status check pauses on the tool call, the next one completes.
    let mut requires_action = run_body("requires_action");
    requires_action["required_action"] = json!({
        "type": "submit_tool_outputs",
        "submit_tool_outputs": {
            "tool_calls": [{
                "id": "call_space",
                "type": "function",
                "function": {"name": "get_news", "arguments": "{\"topic\":\"space\"}"}
            }]
        }
    });
    Mock::given(method("GET"))
        .and(path("/v1/threads/thread_e2e/runs/run_e2e"))
        .respond_with(ResponseTemplate::new(200).set_body_json(requires_action))
        .up_to_n_times(1)
        .mount(&platform)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/threads/thread_e2e/runs/run_e2e"))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body("completed")))
        .mount(&platform)
        .await;

    // The submitted batch must carry the adapter's text: the truncated body
    // for the live article and the placeholder for the dead one.
    Mock::given(method("POST"))
        .and(path("/v1/threads/thread_e2e/runs/run_e2e/submit_tool_outputs"))
        .and(body_string_contains("call_space"))
        .and(body_string_contains(format!("{}...", "y".repeat(2000))))
        .and(body_string_contains("Full text unavailable"))
        .and(body_string_contains("No description available."))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body("in_progress")))
        .expect(1)
        .mount(&platform)
        .await;

    let final_reply = json!({
        "summary": "Orbit was reached while a second attempt slipped [BBC - Orbital launch succeeds] [Reuters - Second launch scrubbed].",
        "citations": [
            {"intextCitation": "BBC", "articleName": "Orbital launch succeeds", "link": format!("{}/article-ok", news.uri())},
            {"intextCitation": "Reuters", "articleName": "Second launch scrubbed", "link": format!("{}/article-missing", news.uri())}
        ]
    });
    Mock::given(method("GET"))
        .and(path("/v1/threads/thread_e2e/messages"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": "msg_final",
                "role": "assistant",
                "content": [{"type": "text", "text": {"value": final_reply.to_string(), "annotations": []}}]
            }]
        })))
        .mount(&platform)
        .await;

    let backend =
        OpenAiAssistantClient::new(PlatformConfig::new(platform.uri(), "test_api_key")).unwrap();
    let news_client = NewsApiClient::new(NewsApiConfig {
        host: news.uri(),
        api_key: "test_news_key".to_string(),
        page_size: 5,
    })
    .unwrap();

    let orchestrator = Orchestrator::new(Box::new(backend), Box::new(news_client), "gpt-3.5-turbo")
        .with_poll_interval(Duration::from_millis(1));

    let mut session = Session::new();
    let outcome = orchestrator
        .summarize_topic(&mut session, "space")
        .await
        .unwrap();

    let expected: Summary = serde_json::from_value(final_reply).unwrap();
    assert_eq!(outcome, SummaryOutcome::Report(expected.clone()));
    assert_eq!(expected.citations.len(), 2);
    assert_eq!(
        expected.citations[0],
        Citation {
            intext_citation: "BBC".to_string(),
            article_name: "Orbital launch succeeds".to_string(),
            link: format!("{}/article-ok", news.uri()),
        }
    );
    assert_eq!(session.assistant_id(), Some("asst_e2e"));
    assert_eq!(session.thread_id(), Some("thread_e2e"));
}
