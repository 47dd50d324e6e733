use reqwest::{Client, Method, RequestBuilder};

use crate::config::BackendConfig;

/// HTTP handle on the document backend, shared by the gateway and the registry.
#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    client: Client,
    token: Option<String>,
}

impl BackendClient {
    pub fn new(client: Client, config: &BackendConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            token: config.token.clone(),
        }
    }

    /// The underlying client, for requests that go straight to the object store.
    pub fn http(&self) -> &Client {
        &self.client
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match self.token {
            Some(ref token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = BackendConfig {
            base_url: "http://backend.internal:3000/".to_string(),
            documents_path: "/documents".to_string(),
            token: None,
        };
        let backend = BackendClient::new(Client::new(), &config);
        assert_eq!(
            backend.url("/upload/upload-url"),
            "http://backend.internal:3000/upload/upload-url"
        );
    }
}
