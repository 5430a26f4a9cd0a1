//! Shared helpers for core integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::ResponseTemplate;

pub fn user_json(id: &str, role: &str) -> Value {
    json!({
        "_id": id,
        "name": format!("User {id}"),
        "email": format!("{id}@example.com"),
        "role": role
    })
}

pub fn auth_response(token: &str, id: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "token": token,
        "user": user_json(id, "user")
    }))
}

pub fn book_json(index: usize, category: &str, owner: &str) -> Value {
    json!({
        "_id": format!("book-{index}"),
        "title": format!("Book {index}"),
        "author": "Author",
        "category": category,
        "quantity": 1,
        "available": index % 2 == 0,
        "addedBy": { "_id": owner, "name": "Owner" }
    })
}

pub fn error_response(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "success": false,
        "message": message
    }))
}
