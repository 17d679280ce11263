//! API documentation
//!
//! Serves an OpenAPI 3.0 document for the transfer routes and a Swagger UI
//! page that renders it.

use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::state::AppState;

const SWAGGER_UI: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>0G Storage API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/api-docs/openapi.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

/// Create the docs router
///
/// The page is served with and without a trailing slash.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api-docs", get(swagger_ui))
        .route("/api-docs/", get(swagger_ui))
        .route("/api-docs/openapi.json", get(openapi))
}

async fn swagger_ui() -> impl IntoResponse {
    Html(SWAGGER_UI)
}

async fn openapi(State(state): State<AppState>) -> Json<Value> {
    Json(openapi_document(state.config().server.port))
}

/// OpenAPI description of the transfer routes
pub fn openapi_document(port: u16) -> Value {
    let error_body = json!({
        "type": "object",
        "properties": { "error": { "type": "string" }, "code": { "type": "string" } }
    });

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "0G Storage API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "API documentation for 0G Storage service"
        },
        "servers": [
            { "url": format!("http://localhost:{}", port), "description": "Development server" }
        ],
        "paths": {
            "/upload": {
                "post": {
                    "summary": "Upload a file",
                    "description": "Upload a file to 0G Storage",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "multipart/form-data": {
                                "schema": {
                                    "type": "object",
                                    "properties": {
                                        "file": { "type": "string", "format": "binary" }
                                    }
                                }
                            }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "File uploaded successfully",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "rootHash": { "type": "string" },
                                            "transactionHash": { "type": "string" }
                                        }
                                    }
                                }
                            }
                        },
                        "400": {
                            "description": "No file uploaded",
                            "content": { "application/json": { "schema": error_body.clone() } }
                        },
                        "500": {
                            "description": "Server error",
                            "content": { "application/json": { "schema": error_body.clone() } }
                        }
                    }
                }
            },
            "/download/{rootHash}": {
                "get": {
                    "summary": "Download a file",
                    "description": "Download a file from 0G Storage using its root hash",
                    "parameters": [{
                        "in": "path",
                        "name": "rootHash",
                        "required": true,
                        "schema": { "type": "string", "pattern": "^0x[0-9a-fA-F]{64}$" },
                        "description": "The root hash of the file to download"
                    }],
                    "responses": {
                        "200": {
                            "description": "File downloaded successfully",
                            "content": {
                                "application/octet-stream": {
                                    "schema": { "type": "string", "format": "binary" }
                                }
                            }
                        },
                        "400": {
                            "description": "Malformed root hash",
                            "content": { "application/json": { "schema": error_body.clone() } }
                        },
                        "500": {
                            "description": "Server error",
                            "content": { "application/json": { "schema": error_body } }
                        }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swagger_page_points_at_absolute_document_url() {
        assert!(SWAGGER_UI.contains(r#"url: "/api-docs/openapi.json""#));
        assert!(SWAGGER_UI.contains(r##"dom_id: "#swagger-ui""##));
        assert!(SWAGGER_UI.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_document_lists_transfer_routes() {
        let doc = openapi_document(4000);

        assert_eq!(doc["openapi"], "3.0.0");
        assert_eq!(doc["servers"][0]["url"], "http://localhost:4000");
        assert!(doc["paths"]["/upload"]["post"].is_object());
        assert!(doc["paths"]["/download/{rootHash}"]["get"].is_object());
        assert_eq!(
            doc["paths"]["/upload"]["post"]["requestBody"]["content"]["multipart/form-data"]
                ["schema"]["properties"]["file"]["format"],
            "binary"
        );
    }
}
