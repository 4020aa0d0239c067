use std::sync::Arc;

use formrelay_di::Build;
use formrelay_extern_contracts::turnstile::TurnstileApiService;
use formrelay_shared_contracts::captcha::{CaptchaCheckError, CaptchaService};

#[derive(Debug, Clone, Build)]
pub struct CaptchaServiceImpl<TurnstileApi> {
    turnstile_api: TurnstileApi,
    config: CaptchaServiceConfig,
}

#[derive(Debug, Clone)]
pub enum CaptchaServiceConfig {
    Disabled,
    Turnstile(TurnstileCaptchaServiceConfig),
}

#[derive(Debug, Clone)]
pub struct TurnstileCaptchaServiceConfig {
    pub secret: Arc<str>,
}

impl<TurnstileApi> CaptchaService for CaptchaServiceImpl<TurnstileApi>
where
    TurnstileApi: TurnstileApiService,
{
    async fn check(&self, response: Option<&str>) -> Result<(), CaptchaCheckError> {
        let CaptchaServiceConfig::Turnstile(config) = &self.config else {
            return Ok(());
        };

        let response = response.ok_or(CaptchaCheckError::Failed)?;
        let result = self.turnstile_api.siteverify(response, &config.secret).await?;
        result.success.then_some(()).ok_or(CaptchaCheckError::Failed)
    }
}

#[cfg(test)]
mod tests {
    use formrelay_extern_contracts::turnstile::{
        MockTurnstileApiService, TurnstileSiteverifyResponse,
    };
    use formrelay_utils::assert_matches;

    use super::*;

    #[tokio::test]
    async fn ok() {
        // Arrange
        let turnstile_api = MockTurnstileApiService::new().with_siteverify(
            "challenge response".into(),
            "the-secret".into(),
            TurnstileSiteverifyResponse {
                success: true,
                error_codes: Vec::new(),
            },
        );

        let sut = CaptchaServiceImpl {
            turnstile_api,
            config: CaptchaServiceConfig::Turnstile(TurnstileCaptchaServiceConfig {
                secret: "the-secret".into(),
            }),
        };

        // Act
        let result = sut.check(Some("challenge response")).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn ok_disabled() {
        // Arrange
        let sut = CaptchaServiceImpl {
            turnstile_api: MockTurnstileApiService::new(),
            config: CaptchaServiceConfig::Disabled,
        };

        // Act
        let result = sut.check(Some("challenge response")).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn ok_disabled_no_response() {
        // Arrange
        let sut = CaptchaServiceImpl {
            turnstile_api: MockTurnstileApiService::new(),
            config: CaptchaServiceConfig::Disabled,
        };

        // Act
        let result = sut.check(None).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn failed() {
        // Arrange
        let turnstile_api = MockTurnstileApiService::new().with_siteverify(
            "challenge response".into(),
            "the-secret".into(),
            TurnstileSiteverifyResponse {
                success: false,
                error_codes: vec!["invalid-input-response".into()],
            },
        );

        let sut = CaptchaServiceImpl {
            turnstile_api,
            config: CaptchaServiceConfig::Turnstile(TurnstileCaptchaServiceConfig {
                secret: "the-secret".into(),
            }),
        };

        // Act
        let result = sut.check(Some("challenge response")).await;

        // Assert
        assert_matches!(result, Err(CaptchaCheckError::Failed));
    }

    #[tokio::test]
    async fn failed_no_response() {
        // Arrange
        let sut = CaptchaServiceImpl {
            turnstile_api: MockTurnstileApiService::new(),
            config: CaptchaServiceConfig::Turnstile(TurnstileCaptchaServiceConfig {
                secret: "the-secret".into(),
            }),
        };

        // Act
        let result = sut.check(None).await;

        // Assert
        assert_matches!(result, Err(CaptchaCheckError::Failed));
    }
}
