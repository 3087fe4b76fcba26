//! Status interactions: boost and favourite.

use thiserror::Error;

use super::client::MastodonClient;
use super::entities::Status;
use crate::paging::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    Boost,
    Unboost,
    Favourite,
    Unfavourite,
}

impl StatusAction {
    /// The action that flips the current state of `status`.
    pub fn toggle_boost(status: &Status) -> Self {
        if status.original().is_reblogged() {
            Self::Unboost
        } else {
            Self::Boost
        }
    }

    pub fn toggle_favourite(status: &Status) -> Self {
        if status.original().is_favourited() {
            Self::Unfavourite
        } else {
            Self::Favourite
        }
    }

    fn endpoint(self) -> &'static str {
        match self {
            Self::Boost => "reblog",
            Self::Unboost => "unreblog",
            Self::Favourite => "favourite",
            Self::Unfavourite => "unfavourite",
        }
    }

    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Boost => "Boosted",
            Self::Unboost => "Removed boost",
            Self::Favourite => "Favourited",
            Self::Unfavourite => "Removed favourite",
        }
    }
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Nothing selected to act on")]
    NoTarget,

    #[error("Sign in to {0}")]
    NotAuthenticated(&'static str),

    #[error("{0}")]
    Request(#[from] FetchError),
}

impl MastodonClient {
    /// Apply `action` to the status `id` and return the updated status.
    ///
    /// Boosting returns a wrapper status around the original; the original
    /// is unwrapped so callers always get the status they acted on.
    pub async fn status_action(
        &self,
        id: &str,
        action: StatusAction,
    ) -> Result<Status, ActionError> {
        if !self.is_authenticated() {
            return Err(ActionError::NotAuthenticated(match action {
                StatusAction::Boost | StatusAction::Unboost => "boost",
                StatusAction::Favourite | StatusAction::Unfavourite => "favourite",
            }));
        }
        tracing::info!(status_id = id, action = ?action, "Status action");
        let path = format!("api/v1/statuses/{}/{}", id, action.endpoint());
        let mut status: Status = self.post(&path).await?;
        if action == StatusAction::Boost {
            if let Some(inner) = status.reblog.take() {
                return Ok(*inner);
            }
        }
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn status_json(id: &str, favourited: bool) -> String {
        format!(
            r#"{{"id": "{id}", "created_at": "2021-03-01T12:00:00Z",
                "account": {{"id": "1", "username": "a", "acct": "a", "url": "https://h/@a"}},
                "visibility": "public", "uri": "https://h/s/{id}", "favourited": {favourited}}}"#
        )
    }

    #[tokio::test]
    async fn favourite_posts_and_returns_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/statuses/42/favourite"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_string(status_json("42", true)))
            .expect(1)
            .mount(&server)
            .await;

        let client = MastodonClient::new(
            &server.uri(),
            Some(SecretString::from("tok".to_string())),
            Duration::from_secs(5),
        )
        .unwrap();
        let status = client
            .status_action("42", StatusAction::Favourite)
            .await
            .unwrap();
        assert!(status.is_favourited());
        assert_eq!(StatusAction::toggle_favourite(&status), StatusAction::Unfavourite);
    }

    #[tokio::test]
    async fn boost_unwraps_wrapper_status() {
        let server = MockServer::start().await;
        let wrapper = format!(
            r#"{{"id": "99", "created_at": "2021-03-01T12:00:00Z",
                "account": {{"id": "2", "username": "me", "acct": "me", "url": "https://h/@me"}},
                "visibility": "public", "uri": "https://h/s/99", "reblog": {}}}"#,
            status_json("42", false)
        );
        Mock::given(method("POST"))
            .and(path("/api/v1/statuses/42/reblog"))
            .respond_with(ResponseTemplate::new(200).set_body_string(wrapper))
            .mount(&server)
            .await;

        let client = MastodonClient::new(
            &server.uri(),
            Some(SecretString::from("tok".to_string())),
            Duration::from_secs(5),
        )
        .unwrap();
        let status = client.status_action("42", StatusAction::Boost).await.unwrap();
        assert_eq!(status.id, "42");
    }

    #[tokio::test]
    async fn actions_require_token() {
        let client =
            MastodonClient::new("https://example.social", None, Duration::from_secs(5)).unwrap();
        let err = client
            .status_action("1", StatusAction::Favourite)
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::NotAuthenticated("favourite")));
    }

    #[tokio::test]
    async fn server_rejection_is_request_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let client = MastodonClient::new(
            &server.uri(),
            Some(SecretString::from("tok".to_string())),
            Duration::from_secs(5),
        )
        .unwrap();
        let err = client
            .status_action("1", StatusAction::Unboost)
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Request(FetchError::Server(404))));
    }
}
