//! Price alerts over the message broker
//!
//! Publisher: one connection per message, declare the queue, publish JSON, close.
//! Consumer: one long-lived connection, auto-acknowledged deliveries, one printed
//! line per message. Broker failures propagate to the caller.

use async_trait::async_trait;
use futures::StreamExt;
use lapin::options::{BasicConsumeOptions, BasicPublishOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};

use crate::config::BrokerConfig;
use crate::error::{AppError, Result};
use crate::models::{AlertMessage, AlertOutcome};
use crate::services::quote_service::QuoteService;

/// Destination for alert messages
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn publish(&self, message: &AlertMessage) -> Result<()>;
}

/// AMQP publisher
pub struct AmqpPublisher {
    config: BrokerConfig,
}

impl AmqpPublisher {
    pub fn new(config: BrokerConfig) -> Self {
        Self { config }
    }
}

async fn open_channel(config: &BrokerConfig) -> Result<(Connection, Channel)> {
    let conn = Connection::connect(&config.amqp_url, ConnectionProperties::default()).await?;
    let channel = conn.create_channel().await?;
    channel
        .queue_declare(
            &config.queue,
            QueueDeclareOptions::default(),
            FieldTable::default(),
        )
        .await?;
    Ok((conn, channel))
}

#[async_trait]
impl AlertSink for AmqpPublisher {
    async fn publish(&self, message: &AlertMessage) -> Result<()> {
        let payload = serde_json::to_vec(message)?;
        let (conn, channel) = open_channel(&self.config).await?;

        channel
            .basic_publish(
                "",
                &self.config.queue,
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default().with_content_type("application/json".into()),
            )
            .await?;
        log::info!("Published alert for {} to {}", message.ticker, self.config.queue);

        conn.close(200, "OK").await?;
        Ok(())
    }
}

/// Publish an alert when the current price has reached the target
pub async fn check_and_publish(
    quotes: &QuoteService,
    sink: &dyn AlertSink,
    symbol: &str,
    target_price: f64,
) -> Result<AlertOutcome> {
    if !target_price.is_finite() || target_price <= 0.0 {
        return Err(AppError::Validation(format!("Invalid target price: {}", target_price)));
    }

    let quote = quotes
        .get_quote(symbol)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No data for {}", symbol)))?;

    let published = quote.current_price >= target_price;
    if published {
        let message = AlertMessage {
            ticker: quote.symbol.clone(),
            target_price,
            current_price: quote.current_price,
        };
        sink.publish(&message).await?;
    }

    Ok(AlertOutcome {
        ticker: quote.symbol,
        target_price,
        current_price: quote.current_price,
        published,
    })
}

/// Decode one delivery into the line shown to the user
pub fn handle_delivery(body: &[u8]) -> Result<String> {
    let message: AlertMessage = serde_json::from_slice(body)?;
    Ok(message.describe())
}

/// Consume the alert queue until the connection drops
pub async fn run_consumer(config: &BrokerConfig) -> Result<()> {
    let (_conn, channel) = open_channel(config).await?;

    let mut consumer = channel
        .basic_consume(
            &config.queue,
            "alert-worker",
            BasicConsumeOptions {
                no_ack: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await?;

    log::info!("Waiting for alerts on queue {}", config.queue);

    while let Some(delivery) = consumer.next().await {
        let delivery = delivery?;
        match handle_delivery(&delivery.data) {
            Ok(line) => println!("{}", line),
            Err(e) => log::error!("Skipping malformed alert: {}", e),
        }
    }

    log::warn!("Alert consumer stream ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::services::testing::{quote_with_daily, StubProvider};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<AlertMessage>>,
    }

    #[async_trait]
    impl AlertSink for RecordingSink {
        async fn publish(&self, message: &AlertMessage) -> Result<()> {
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    fn service() -> QuoteService {
        let mut quote = quote_with_daily("PETR4.SA", 0.0);
        quote.current_price = 40.05;
        let provider = Arc::new(StubProvider::new().with_quote(quote));
        QuoteService::new(provider, &AppConfig::default())
    }

    #[test]
    fn test_handle_delivery_mentions_every_field() {
        let body = br#"{"ticker":"PETR4","target_price":40.0,"current_price":40.05}"#;
        let line = handle_delivery(body).unwrap();

        assert!(line.contains("PETR4"));
        assert!(line.contains("40.00"));
        assert!(line.contains("40.05"));
    }

    #[test]
    fn test_handle_delivery_malformed() {
        assert!(handle_delivery(b"not json").is_err());
        assert!(handle_delivery(br#"{"ticker":"PETR4"}"#).is_err());
    }

    #[tokio::test]
    async fn test_publishes_when_target_reached() {
        let sink = RecordingSink::default();
        let outcome = check_and_publish(&service(), &sink, "PETR4.SA", 40.0).await.unwrap();

        assert!(outcome.published);
        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].ticker, "PETR4.SA");
        assert_eq!(sent[0].current_price, 40.05);
    }

    #[tokio::test]
    async fn test_no_publish_below_target() {
        let sink = RecordingSink::default();
        let outcome = check_and_publish(&service(), &sink, "PETR4.SA", 45.0).await.unwrap();

        assert!(!outcome.published);
        assert!(sink.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_target_rejected() {
        let sink = RecordingSink::default();
        let err = check_and_publish(&service(), &sink, "PETR4.SA", -1.0).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
