use reqwest::multipart::{Form, Part};

use super::WidgetState;

/// Posts one media file to `<server>/transcribe` and maps the outcome to what
/// the widget displays. Never fails: transport errors become `Failed`.
pub async fn submit_file(
    client: &reqwest::Client,
    server: &str,
    file_name: &str,
    data: Vec<u8>,
    mime: &str,
) -> WidgetState {
    let part = match Part::bytes(data).file_name(file_name.to_string()).mime_str(mime) {
        Ok(part) => part,
        Err(e) => return WidgetState::network_error(e),
    };
    let form = Form::new().part("file", part);
    let url = format!("{}/transcribe", server.trim_end_matches('/'));

    let response = match client.post(&url).multipart(form).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Error uploading file: {}", e);
            return WidgetState::network_error(e);
        }
    };

    let status = response.status();
    match response.bytes().await {
        Ok(body) => WidgetState::from_response(status, &body),
        Err(e) => WidgetState::network_error(e),
    }
}
