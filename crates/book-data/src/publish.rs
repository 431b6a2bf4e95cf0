//! Destination for resolved records.

use async_trait::async_trait;

use crate::errors::BookDataError;
use crate::models::BookRecord;

/// Writes a resolved record into an external collection (a reading log,
/// a database page, a spreadsheet).
///
/// Implementations report failures as [`BookDataError::PublishFailed`]
/// carrying the destination's message.
#[async_trait]
pub trait BookPublisher: Send + Sync {
    async fn publish(&self, book: &BookRecord, collection_id: &str) -> Result<(), BookDataError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceTag;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryPublisher {
        published: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl BookPublisher for MemoryPublisher {
        async fn publish(&self, book: &BookRecord, collection_id: &str) -> Result<(), BookDataError> {
            if collection_id.is_empty() {
                return Err(BookDataError::PublishFailed(
                    "collection not found".to_string(),
                ));
            }
            self.published
                .lock()
                .unwrap()
                .push((collection_id.to_string(), book.isbn().to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_publisher_through_trait_object() {
        let publisher: Box<dyn BookPublisher> = Box::new(MemoryPublisher::default());
        let book = BookRecord::new("9784839974206", SourceTag::OpenBd).title("題名");

        publisher.publish(&book, "reading-list").await.unwrap();

        let err = publisher.publish(&book, "").await.unwrap_err();
        assert_eq!(err.to_string(), "Publish failed: collection not found");
    }
}
