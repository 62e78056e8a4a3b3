use tracing::{error, info};

use crate::contract::{MediaReference, PostReceipt, Publisher, Todo};
use crate::error::RunError;

pub const POST_PREFIX: &str = "✅ ";
pub const POST_SUFFIX: &str = " #buildinpublic";

/// Fixed template: `"✅ " + body + " #buildinpublic"`.
pub fn compose_post_text(body: &str) -> String {
    format!("{POST_PREFIX}{body}{POST_SUFFIX}")
}

/// Publish one todo with its already-resolved media, in order.
pub async fn publish_todo<P>(
    publisher: &P,
    todo: &Todo,
    media: &[MediaReference],
) -> Result<PostReceipt, RunError>
where
    P: Publisher + ?Sized,
{
    let text = compose_post_text(&todo.body);
    info!(todo_id = %todo.id, media = media.len(), text = %text, "[PUBLISH] About to post");
    match publisher.create_post(&text, media).await {
        Ok(receipt) => {
            info!(todo_id = %todo.id, post_id = %receipt.id, "[PUBLISH] Post created");
            Ok(receipt)
        }
        Err(e) => {
            error!(todo_id = %todo.id, error = ?e, "[PUBLISH][ERROR] Post creation failed");
            Err(RunError::Publish {
                todo_id: todo.id.clone(),
                source: e,
            })
        }
    }
}
