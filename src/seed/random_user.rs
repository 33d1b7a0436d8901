use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::{IdentitySource, RandomIdentity, SeedError};

#[derive(Deserialize)]
struct RandomUserResponse {
    results: Vec<RandomIdentity>,
}

/// Client for a randomuser.me compatible generator.
pub struct RandomUserClient {
    client: reqwest::Client,
    base_url: Url,
    nationality: String,
}

impl RandomUserClient {
    pub fn new(base_url: Url, nationality: impl Into<String>) -> Result<Self, SeedError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            base_url,
            nationality: nationality.into(),
        })
    }

    pub fn request_url(&self, count: usize) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("results", &count.to_string())
            .append_pair("nat", &self.nationality);
        url
    }
}

impl IdentitySource for RandomUserClient {
    fn fetch(&self, count: usize) -> BoxFuture<'_, Result<Vec<RandomIdentity>, SeedError>> {
        async move {
            let response = self
                .client
                .get(self.request_url(count))
                .send()
                .await?
                .error_for_status()?;
            let body: RandomUserResponse = response.json().await?;
            Ok(body.results)
        }
        .boxed()
    }
}
