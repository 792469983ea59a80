mod cli;
mod handlers;

pub use cli::App;

use crate::generate::Generator;
use crate::prelude::{eprintln, *};
use crate::store::Store;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Everything a request handler needs, built once at startup.
pub struct AppContext {
    pub generator: Generator,
    pub store: Store,
}

pub type SharedContext = Arc<AppContext>;

pub fn router(context: SharedContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/generate/", post(handlers::generate::generate))
        .route("/api/signup", post(handlers::accounts::signup))
        .route("/api/login", post(handlers::accounts::login))
        .route("/api/tasks", post(handlers::tasks::add_task))
        // GET takes a username, DELETE a task id.
        .route(
            "/api/tasks/{key}",
            get(handlers::tasks::list_tasks).delete(handlers::tasks::delete_task),
        )
        .route("/download/{archive}", get(handlers::files::download))
        .route(
            "/generated_projects/{project_id}/{*path}",
            get(handlers::files::generated_file),
        )
        .layer(cors)
        .with_state(context)
}

/// Module entry point
pub async fn run(app: App, global: crate::Global) -> Result<()> {
    // Prepare the output directory and database
    let generator = Generator::from_options(&app.generator)?;
    std::fs::create_dir_all(generator.generated_dir()).with_context(|| {
        f!(
            "Failed to create {}",
            generator.generated_dir().display()
        )
    })?;
    let store = Store::open(&app.database).map_err(|e| eyre!(e))?;

    let addr = format!("{}:{}", app.host, app.port);

    if global.verbose {
        eprintln!("Database: {}", app.database.display());
        eprintln!("Generated projects: {}", app.generator.generated_dir.display());
        eprintln!("Model: {}", app.generator.completion.model);
        eprintln!("Strategy: {}", app.generator.strategy);
    }

    let context = Arc::new(AppContext { generator, store });

    // Bind and serve
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    log::info!("sitegen listening on http://{addr}");

    axum::serve(listener, router(context))
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::tests::{CannedCompleter, FailingCompleter, MARKER_RESPONSE};
    use crate::llm::Completer;
    use serde_json::{json, Value};
    use sitegen_core::extract::Strategy;
    use std::io::Cursor;
    use tempfile::TempDir;

    struct TestServer {
        base_url: String,
        client: reqwest::Client,
        _temp_dir: TempDir,
    }

    impl TestServer {
        async fn start(strategy: Strategy, completer: impl Completer + 'static) -> Self {
            let temp_dir = TempDir::new().unwrap();
            let generator = Generator::new(
                temp_dir.path().join("generated_projects"),
                strategy,
                Arc::new(completer),
            );
            let context = Arc::new(AppContext {
                generator,
                store: Store::open_in_memory().unwrap(),
            });

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, router(context)).await.unwrap();
            });

            Self {
                base_url: format!("http://{addr}"),
                client: reqwest::Client::new(),
                _temp_dir: temp_dir,
            }
        }

        fn url(&self, path: &str) -> String {
            format!("{}{}", self.base_url, path)
        }

        async fn generate(&self, body: Value) -> (u16, Value) {
            let response = self
                .client
                .post(self.url("/generate/"))
                .json(&body)
                .send()
                .await
                .unwrap();
            let status = response.status().as_u16();
            (status, response.json().await.unwrap())
        }

        async fn form(&self, path: &str, fields: &[(&str, &str)]) -> Value {
            self.client
                .post(self.url(path))
                .form(fields)
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap()
        }
    }

    async fn marker_server() -> TestServer {
        TestServer::start(
            Strategy::Marker,
            CannedCompleter(MARKER_RESPONSE.to_string()),
        )
        .await
    }

    #[tokio::test]
    async fn test_generate_then_download() {
        let server = marker_server().await;

        let (status, body) = server.generate(json!({ "description": "a todo app" })).await;
        assert_eq!(status, 200);
        assert_eq!(body["message"], "Project generated successfully");
        let project_id = body["project_id"].as_str().unwrap().to_string();

        let response = server
            .client
            .get(server.url(&format!("/download/{project_id}.zip")))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(response.headers()["content-type"], "application/zip");

        let bytes = response.bytes().await.unwrap();
        assert!(!bytes.is_empty());

        let archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert!(names.contains(&format!("{project_id}/index.html").as_str()));
        assert!(names.contains(&format!("{project_id}/index_preview.html").as_str()));
    }

    #[tokio::test]
    async fn test_generated_files_are_served_with_content_type() {
        let server = marker_server().await;
        let (_, body) = server.generate(json!({ "description": "a todo app" })).await;
        let project_id = body["project_id"].as_str().unwrap();

        let response = server
            .client
            .get(server.url(&format!("/generated_projects/{project_id}/about.html")))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(response.headers()["content-type"], "text/html");

        let html = response.text().await.unwrap();
        assert!(html.contains(&format!(
            r#"<head><base href="/generated_projects/{project_id}/">"#
        )));
    }

    #[tokio::test]
    async fn test_missing_files_are_404() {
        let server = marker_server().await;
        let (_, body) = server.generate(json!({ "description": "a todo app" })).await;
        let project_id = body["project_id"].as_str().unwrap();

        for path in [
            format!("/generated_projects/{project_id}/missing.html"),
            "/generated_projects/nope/index.html".to_string(),
            format!("/generated_projects/{project_id}/..%2F..%2Fdata.db"),
            "/download/nope.zip".to_string(),
            format!("/download/{project_id}"),
        ] {
            let response = server.client.get(server.url(&path)).send().await.unwrap();
            assert_eq!(response.status().as_u16(), 404, "{path}");
            let body: Value = response.json().await.unwrap();
            assert_eq!(body["error"], "File not found");
        }
    }

    #[tokio::test]
    async fn test_blank_or_missing_description_is_400() {
        let server = marker_server().await;

        for body in [json!({ "description": "   " }), json!({})] {
            let (status, body) = server.generate(body).await;
            assert_eq!(status, 400);
            assert_eq!(body["error"], "Missing project description");
        }
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500() {
        let server = TestServer::start(Strategy::Marker, FailingCompleter).await;

        let (status, body) = server.generate(json!({ "description": "a todo app" })).await;
        assert_eq!(status, 500);
        assert!(body["error"].as_str().unwrap().contains("401 Unauthorized"));
    }

    #[tokio::test]
    async fn test_unparseable_model_output_is_500() {
        let server = TestServer::start(
            Strategy::Envelope,
            CannedCompleter("no files for you".to_string()),
        )
        .await;

        let (status, body) = server.generate(json!({ "description": "a todo app" })).await;
        assert_eq!(status, 500);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_signup_and_login() {
        let server = marker_server().await;
        let alice = [("username", "alice"), ("password", "hunter2")];

        let body = server.form("/api/signup", &alice).await;
        assert_eq!(body, json!({ "success": true, "message": "Signup successful!" }));

        let body = server.form("/api/signup", &alice).await;
        assert_eq!(
            body,
            json!({ "success": false, "message": "Username already exists" })
        );

        let body = server.form("/api/login", &alice).await;
        assert_eq!(body["success"], true);

        let body = server
            .form("/api/login", &[("username", "alice"), ("password", "nope")])
            .await;
        assert_eq!(body, json!({ "success": false, "message": "Invalid credentials" }));
    }

    #[tokio::test]
    async fn test_task_crud() {
        let server = marker_server().await;

        let body = server
            .form("/api/tasks", &[("username", "alice"), ("content", "buy milk")])
            .await;
        assert_eq!(body, json!({ "success": true, "message": "Task added" }));

        let tasks: Value = server
            .client
            .get(server.url("/api/tasks/alice"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(tasks[0]["content"], "buy milk");
        let task_id = tasks[0]["id"].as_i64().unwrap();

        let body: Value = server
            .client
            .delete(server.url(&format!("/api/tasks/{task_id}")))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body, json!({ "success": true, "message": "Task deleted" }));

        let tasks: Value = server
            .client
            .get(server.url("/api/tasks/alice"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(tasks, json!([]));
    }
}
