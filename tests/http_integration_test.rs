mod common;

use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use serde_json::{Value, json};

use common::{correct_data, no_field_data, test_app, wrong_field_data};

/// Serves a fresh in-memory app on an ephemeral port; returns the `/courses` url.
async fn spawn_server() -> String {
    let (app, _db) = test_app().await;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server error");
    });

    format!("http://{addr}/courses")
}

fn assert_field(body: &Value, field: &str, expected: &str) {
    assert_eq!(body.get(field).and_then(Value::as_str), Some(expected), "body: {body}");
}

#[tokio::test]
async fn test_course_lifecycle_over_http() {
    let courses_url = spawn_server().await;
    let client = Client::new();
    let add_url = format!("{courses_url}/add");

    // Correct data
    let response = client.post(&add_url).json(&correct_data()).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_field(&response.json::<Value>().await.unwrap(), "status", "Course added!");

    // No JSON received
    let response = client
        .post(&add_url)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body("name=Data+Science&lessons=18")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_field(&response.json::<Value>().await.unwrap(), "error", "No json received..");

    // Missing field
    let response = client.post(&add_url).json(&no_field_data()).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_field(&response.json::<Value>().await.unwrap(), "error", "Field 'lessons' not found..");

    // Incorrect field data
    let response = client.post(&add_url).json(&wrong_field_data()).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_field(
        &response.json::<Value>().await.unwrap(),
        "error",
        "Incorrect type of 'end_date' field..",
    );

    let response = client.get(&courses_url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!([correct_data()]));

    let response = client.get(format!("{courses_url}/1")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, correct_data());

    let response = client.get(format!("{courses_url}/1500")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_field(&response.json::<Value>().await.unwrap(), "status", "Course not found..");

    let response = client
        .patch(format!("{courses_url}/1"))
        .json(&no_field_data())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.bytes().await.unwrap().is_empty());

    let response = client
        .patch(format!("{courses_url}/1"))
        .json(&wrong_field_data())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_field(
        &response.json::<Value>().await.unwrap(),
        "error",
        "Incorrect type of 'end_date' field..",
    );

    let response = client.delete(format!("{courses_url}/1")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client.delete(format!("{courses_url}/1")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_filter_by_name_over_http() {
    let courses_url = spawn_server().await;
    let client = Client::new();

    client
        .post(format!("{courses_url}/add"))
        .json(&correct_data())
        .send()
        .await
        .unwrap();

    for course_name in ["Data%20Science", "Incorrect%20course%20name"] {
        let url1 = format!("{courses_url}/{course_name}");
        let response = client.get(&url1).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.json::<Value>().await.unwrap().is_array());

        for bottom_date in ["22", "2021-06-20%2018:00:00"] {
            let url2 = format!("{url1}?bottom_date={bottom_date}");
            let response = client.get(&url2).send().await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert!(response.json::<Value>().await.unwrap().is_array());

            for top_date in ["2022-11-21%2021:00:00", "some%20string"] {
                let url3 = format!("{url2}&top_date={top_date}");
                let response = client.get(&url3).send().await.unwrap();
                assert_eq!(response.status(), StatusCode::OK);
                assert!(response.json::<Value>().await.unwrap().is_array());
            }
        }
    }

    let url = format!(
        "{courses_url}/Data%20Science?bottom_date=2021-06-20%2018:00:00&top_date=2022-11-21%2021:00:00"
    );
    let body: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(body, json!([correct_data()]));
}

#[tokio::test]
async fn test_unknown_address_over_http() {
    let courses_url = spawn_server().await;
    let client = Client::new();

    let response = client
        .get(courses_url.replace("/courses", "/students"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_field(&response.json::<Value>().await.unwrap(), "error", "Non-existent address..");
}
