// Helpers for reading response bodies in tests

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::Response;

pub async fn read_body(response: Response<Full<Bytes>>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn read_json(response: Response<Full<Bytes>>) -> serde_json::Value {
    serde_json::from_str(&read_body(response).await).unwrap()
}
