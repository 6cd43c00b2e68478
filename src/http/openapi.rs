//! OpenAPI 3 description served at `/v3/api-docs`.
//!
//! Built once from the route table at startup. Each path becomes one GET
//! operation whose `200` response lists every registered media type, so
//! the versions of a resource sit side by side in the document.
//! An operation is `deprecated` only when every representation of its path
//! is; single deprecated representations carry `x-deprecated: true`.

use serde_json::{json, Map, Value};

use crate::config::OpenApiConfig;
use crate::routing::{Route, RouteTable};

/// Path of the document.
pub const API_DOCS_PATH: &str = "/v3/api-docs";

const ERROR_SCHEMA: &str = "ErrorBody";

/// Build the OpenAPI document for `table`.
pub fn document(config: &OpenApiConfig, table: &RouteTable) -> Value {
    let mut paths = Map::new();
    for path in table.paths() {
        let routes: Vec<&Route> = table.routes().filter(|route| route.path == path).collect();
        paths.insert(path.to_string(), json!({ "get": operation(&routes) }));
    }

    let mut schemas = Map::new();
    for route in table.routes() {
        if let Some((name, schema)) = &route.doc.schema {
            schemas.entry(name.clone()).or_insert_with(|| schema.clone());
        }
    }
    schemas.insert(ERROR_SCHEMA.to_string(), error_schema());

    let mut document = json!({
        "openapi": "3.0.1",
        "info": info(config),
        "servers": [{ "url": config.server_url, "description": "Default server" }],
        "paths": paths,
        "components": { "schemas": schemas },
    });
    if let Some(url) = &config.external_docs_url {
        document["externalDocs"] = json!({
            "description": config.external_docs_description.clone().unwrap_or_default(),
            "url": url,
        });
    }
    document
}

fn info(config: &OpenApiConfig) -> Value {
    let mut info = json!({
        "title": config.title,
        "version": config.version,
        "description": config.description,
    });
    if let Some(terms) = &config.terms_of_service_url {
        info["termsOfService"] = json!(terms);
    }

    let mut contact = Map::new();
    for (key, value) in [
        ("name", &config.contact_name),
        ("url", &config.contact_url),
        ("email", &config.contact_email),
    ] {
        if let Some(value) = value {
            contact.insert(key.to_string(), json!(value));
        }
    }
    if !contact.is_empty() {
        info["contact"] = Value::Object(contact);
    }

    if let Some(name) = &config.license_name {
        let mut license = json!({ "name": name });
        if let Some(url) = &config.license_url {
            license["url"] = json!(url);
        }
        info["license"] = license;
    }
    info
}

fn operation(routes: &[&Route]) -> Value {
    let summary = routes
        .iter()
        .find(|route| route.is_default)
        .or_else(|| routes.first())
        .and_then(|route| route.doc.summary.clone());

    let mut parameters: Vec<&str> = Vec::new();
    for route in routes {
        for name in &route.doc.query_params {
            if !parameters.contains(&name.as_str()) {
                parameters.push(name);
            }
        }
    }

    let mut content = Map::new();
    for route in routes {
        let mut media = Map::new();
        if let Some((name, _)) = &route.doc.schema {
            media.insert("schema".into(), schema_ref(name));
        }
        if route.deprecation.is_some() {
            media.insert("x-deprecated".into(), Value::Bool(true));
        }
        content.insert(route.media_type.clone(), Value::Object(media));
    }

    let mut operation = json!({
        "tags": [routes.first().map(|route| route.resource.as_str()).unwrap_or_default()],
        "parameters": parameters
            .iter()
            .map(|name| json!({
                "name": name,
                "in": "query",
                "required": false,
                "schema": { "type": "string" },
            }))
            .collect::<Vec<_>>(),
        "responses": {
            "200": { "description": "OK", "content": content },
            "400": error_response("Malformed query string"),
            "406": error_response("None of the requested media types is produced"),
        },
    });
    if let Some(summary) = summary {
        operation["summary"] = json!(summary);
    }
    if routes.iter().all(|route| route.deprecation.is_some()) {
        operation["deprecated"] = Value::Bool(true);
    }
    operation
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{name}") })
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema_ref(ERROR_SCHEMA) } },
    })
}

fn error_schema() -> Value {
    json!({
        "type": "object",
        "required": ["timestamp", "status", "error", "message", "path", "traceId"],
        "properties": {
            "timestamp": { "type": "string", "format": "date-time" },
            "status": { "type": "integer", "format": "int32" },
            "error": { "type": "string" },
            "message": { "type": "string" },
            "path": { "type": "string" },
            "traceId": { "type": "string" }
        }
    })
}
