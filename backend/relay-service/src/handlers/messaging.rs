/// Send handlers
///
/// Each handler reshapes the request into a provider message, makes exactly
/// one provider call and reports its outcome unchanged.
use actix_web::{web, HttpResponse};
use fcm_shared::{Message, MulticastMessage};
use tracing::{info, warn};

use crate::error::Result;
use crate::extract::Body;
use crate::models::{ApiResponse, SendToDeviceRequest, SendToMultipleRequest, SendToTopicRequest};
use crate::SharedProvider;

/// Send a notification to one device
///
/// POST /send-to-device
pub async fn send_to_device(
    provider: web::Data<SharedProvider>,
    req: Body<SendToDeviceRequest>,
) -> Result<HttpResponse> {
    let message = Message::from(req.into_inner());

    match provider.send(&message).await {
        Ok(receipt) => {
            info!("Device notification sent: {}", receipt);
            Ok(HttpResponse::Ok().json(ApiResponse::ok(receipt)))
        }
        Err(e) => {
            warn!("Device notification failed ({}): {}", e.code(), e);
            Err(e.into())
        }
    }
}

/// Send a notification to several devices in one provider call
///
/// POST /send-to-multiple
pub async fn send_to_multiple(
    provider: web::Data<SharedProvider>,
    req: Body<SendToMultipleRequest>,
) -> Result<HttpResponse> {
    let message = MulticastMessage::from(req.into_inner());

    match provider.send_multicast(&message).await {
        Ok(batch) => {
            info!(
                "Multicast notification sent to {} tokens: {} delivered, {} failed",
                batch.responses.len(),
                batch.success_count,
                batch.failure_count
            );
            Ok(HttpResponse::Ok().json(ApiResponse::ok(batch)))
        }
        Err(e) => {
            warn!("Multicast notification failed ({}): {}", e.code(), e);
            Err(e.into())
        }
    }
}

/// Send a notification to every subscriber of a topic
///
/// POST /send-to-topic
pub async fn send_to_topic(
    provider: web::Data<SharedProvider>,
    req: Body<SendToTopicRequest>,
) -> Result<HttpResponse> {
    let message = Message::from(req.into_inner());

    match provider.send(&message).await {
        Ok(receipt) => {
            info!(
                "Topic notification sent to {}: {}",
                message.topic.as_ref().and_then(serde_json::Value::as_str).unwrap_or_default(),
                receipt
            );
            Ok(HttpResponse::Ok().json(ApiResponse::ok(receipt)))
        }
        Err(e) => {
            warn!("Topic notification failed ({}): {}", e.code(), e);
            Err(e.into())
        }
    }
}

/// Register routes
pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/send-to-device", web::post().to(send_to_device))
        .route("/send-to-multiple", web::post().to(send_to_multiple))
        .route("/send-to-topic", web::post().to(send_to_topic));
}
