use anyhow::Context;
use common::api::{
    ErrorResponse, SetStatusRequest, SiteCreateRequest, SiteCreateResponse, SiteStatus,
    SiteSummary, SiteSummaryPage,
};
use uuid::Uuid;

/// Thin typed client for the controller's operator API.
pub struct OperatorApi {
    client: reqwest::Client,
    base: String,
    token: Option<String>,
}

impl OperatorApi {
    pub fn new(client: reqwest::Client, base: String, token: Option<String>) -> Self {
        Self {
            client,
            base: base.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method, format!("{}{}", self.base, path));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn expect_success(res: reqwest::Response) -> anyhow::Result<reqwest::Response> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let body = res.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(err) => anyhow::bail!("{} ({})", err.error, status),
            Err(_) => anyhow::bail!("controller returned {status}: {body}"),
        }
    }

    pub async fn list_sites(&self, limit: u32, offset: u32) -> anyhow::Result<SiteSummaryPage> {
        let res = self
            .request(
                reqwest::Method::GET,
                &format!("/api/v1/sites?limit={limit}&offset={offset}"),
            )
            .send()
            .await
            .context("reach controller")?;
        Ok(Self::expect_success(res).await?.json().await?)
    }

    pub async fn create_site(&self, name: &str, url: &str) -> anyhow::Result<SiteCreateResponse> {
        let res = self
            .request(reqwest::Method::POST, "/api/v1/sites")
            .json(&SiteCreateRequest {
                name: name.to_string(),
                url: url.to_string(),
            })
            .send()
            .await
            .context("reach controller")?;
        Ok(Self::expect_success(res).await?.json().await?)
    }

    pub async fn get_site(&self, id: Uuid) -> anyhow::Result<SiteSummary> {
        let res = self
            .request(reqwest::Method::GET, &format!("/api/v1/sites/{id}"))
            .send()
            .await
            .context("reach controller")?;
        Ok(Self::expect_success(res).await?.json().await?)
    }

    pub async fn delete_site(&self, id: Uuid) -> anyhow::Result<()> {
        let res = self
            .request(reqwest::Method::DELETE, &format!("/api/v1/sites/{id}"))
            .send()
            .await
            .context("reach controller")?;
        Self::expect_success(res).await?;
        Ok(())
    }

    pub async fn set_status(&self, id: Uuid, status: SiteStatus) -> anyhow::Result<SiteSummary> {
        let res = self
            .request(reqwest::Method::POST, &format!("/api/v1/sites/{id}/status"))
            .json(&SetStatusRequest { status })
            .send()
            .await
            .context("reach controller")?;
        Ok(Self::expect_success(res).await?.json().await?)
    }
}
