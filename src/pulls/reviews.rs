//! pulls::reviews
//!
//! Submitted reviews on a pull request.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::pr_id;
use super::types::{Review, ReviewState};
use crate::client::GitHubClient;
use crate::error::GitError;
use crate::remote::RemoteRequest;

impl GitHubClient {
    /// Reviews of a pull request in submission order.
    pub async fn pull_request_reviews(&self, pr_uri: &str) -> Result<Vec<Review>, GitError> {
        let id = pr_id(pr_uri)?;
        let repo = id.repository();
        let reviews: Vec<GitHubReview> = self
            .send(RemoteRequest::get(
                repo.api_path(&format!("pulls/{}/reviews", id.number)),
            ))
            .await
            .map_err(|e| e.located(&format!("pulls/{}", id.number), &repo, "pull request"))?;
        Ok(reviews.into_iter().map(Review::from).collect())
    }
}

#[derive(Deserialize)]
struct GitHubReview {
    id: u64,
    state: String,
    user: Option<GitHubUser>,
    submitted_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct GitHubUser {
    login: String,
}

impl From<GitHubReview> for Review {
    fn from(review: GitHubReview) -> Self {
        Review {
            id: review.id,
            state: ReviewState::parse(&review.state),
            user: review.user.map(|u| u.login),
            submitted_at: review.submitted_at,
        }
    }
}
