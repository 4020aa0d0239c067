use std::sync::LazyLock;

use anyhow::Context;
use email_address::EmailAddress;
use formrelay_email_contracts::{ContentType, Email, EmailService};
use formrelay_extern_impl::http::{HttpClient, USER_AGENT};
use oauth2::{
    basic::BasicClient, AccessToken, AuthUrl, ClientId, ClientSecret, Scope, TokenResponse,
    TokenUrl,
};
use serde::Serialize;
use url::Url;

const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// [`EmailService`] backed by a Microsoft-Graph-style mail API.
///
/// Each send acquires a fresh bearer token through the OAuth2
/// client-credentials flow and posts the message to the provider's
/// `sendMail` endpoint.
#[derive(Clone)]
pub struct EmailServiceImpl {
    oauth: BasicClient,
    send_endpoint: Url,
    http: HttpClient,
}

#[derive(Debug, Clone)]
pub struct EmailServiceConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub sender: EmailAddress,
    pub token_endpoint_override: Option<Url>,
    pub send_endpoint_override: Option<Url>,
}

impl EmailServiceImpl {
    pub fn new(config: EmailServiceConfig) -> anyhow::Result<Self> {
        let auth_url = AuthUrl::new(format!(
            "https://login.microsoftonline.com/{}/oauth2/v2.0/authorize",
            config.tenant_id
        ))?;

        let token_url = match config.token_endpoint_override {
            Some(url) => TokenUrl::from_url(url),
            None => TokenUrl::new(format!(
                "https://login.microsoftonline.com/{}/oauth2/v2.0/token",
                config.tenant_id
            ))?,
        };

        let oauth = BasicClient::new(
            ClientId::new(config.client_id),
            Some(ClientSecret::new(config.client_secret)),
            auth_url,
            Some(token_url),
        );

        let send_endpoint = match config.send_endpoint_override {
            Some(url) => url,
            None => format!(
                "https://graph.microsoft.com/v1.0/users/{}/sendMail",
                config.sender
            )
            .parse()?,
        };

        Ok(Self {
            oauth,
            send_endpoint,
            http: HttpClient::default(),
        })
    }

    async fn acquire_token(&self) -> anyhow::Result<AccessToken> {
        let response = self
            .oauth
            .exchange_client_credentials()
            .add_scope(Scope::new(GRAPH_SCOPE.into()))
            .request_async(http_client)
            .await
            .context("Failed to acquire mail API access token")?;

        Ok(response.access_token().clone())
    }
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> anyhow::Result<()> {
        let token = self.acquire_token().await?;

        let recipient = email.recipient.to_string();
        let reply_to = email.reply_to.map(|x| x.to_string());
        let request = SendMailRequest {
            message: Message {
                subject: &email.subject,
                body: ItemBody {
                    content_type: match email.content_type {
                        ContentType::Text => "Text",
                        ContentType::Html => "HTML",
                    },
                    content: &email.body,
                },
                to_recipients: vec![Recipient::new(&recipient)],
                reply_to: reply_to.as_deref().map(Recipient::new).into_iter().collect(),
            },
            save_to_sent_items: false,
        };

        let response = self
            .http
            .post(self.send_endpoint.clone())
            .bearer_auth(token.secret())
            .json(&request)
            .send()
            .await
            .context("Failed to send request to mail API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Mail API rejected the message ({status}): {body}");
        }

        Ok(())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.acquire_token().await.map(|_| ())
    }
}

static USER_AGENT_VALUE: LazyLock<oauth2::http::HeaderValue> =
    LazyLock::new(|| oauth2::http::HeaderValue::from_str(&USER_AGENT).unwrap());

async fn http_client(
    mut request: oauth2::HttpRequest,
) -> Result<oauth2::HttpResponse, oauth2::reqwest::AsyncHttpClientError> {
    request
        .headers
        .insert(oauth2::http::header::USER_AGENT, USER_AGENT_VALUE.clone());
    oauth2::reqwest::async_http_client(request).await
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMailRequest<'a> {
    message: Message<'a>,
    save_to_sent_items: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Message<'a> {
    subject: &'a str,
    body: ItemBody<'a>,
    to_recipients: Vec<Recipient<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    reply_to: Vec<Recipient<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemBody<'a> {
    content_type: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Recipient<'a> {
    email_address: Address<'a>,
}

impl<'a> Recipient<'a> {
    fn new(address: &'a str) -> Self {
        Self {
            email_address: Address { address },
        }
    }
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    address: &'a str,
}
