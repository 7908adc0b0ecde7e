//! Shared fixtures for integration tests.
//!
//! - two fixed RSA-2048 key pairs (`primary` is published, `rogue` never is)
//! - a wiremock JWKS endpoint
//! - helpers to mint RS256 tokens with arbitrary claims

#![allow(dead_code)]

use std::sync::Arc;

use bearer_authz::services::auth::{Authorizer, AuthorizerConfig, JsonWebKey, KeySet};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub const DOMAIN: &str = "tenant.example.com";
pub const ISSUER: &str = "https://tenant.example.com/";
pub const AUDIENCE: &str = "image";
pub const PRIMARY_KID: &str = "primary-2025";
pub const JWKS_PATH: &str = "/.well-known/jwks.json";

pub const PRIMARY_PRIVATE_PEM: &str = include_str!("../fixtures/primary_rsa.pem");
pub const ROGUE_PRIVATE_PEM: &str = include_str!("../fixtures/rogue_rsa.pem");

pub const PRIMARY_N: &str = "oCcgRHVZPFFsQvedcTc2hGPNS0_EhKRTiD_LfCeE_ER1B5dYIZf1qLvGqNZXLf6HL1ABqyRviVQB3HHjiDE9W6SGet9ikytDhVndrp2SH-ZHNUl3x5y2IFy6f-ZdEHi8rooGfqA_yRMufqYZVpLl2Z_gdFxAXKrtxmxigwJbbd_U0-7ha5cqkl1IiEx7k3dIeS5RGV9oA7KkYJ6epxyem35li2L9Bwbt8DPnDz_X0u3aqGRZRmYfH-_1IFLDmmDpG-cT2AcU2UumoEwMMy2g1_Q2EcnfZVKEh5bogFpn2NBteSAmlJFV--7bIIpzNgh7QiapV2xgXSIgElW4kIenvw";
pub const ROGUE_N: &str = "vdrfzwLjTQeOgC0No7BrmhE0KgZLmfXfcit0Zv2HNUovromhlNCSDXIatmjUz5o0a8j76-14hDwpUfcB_9MaE_PZH_p2jZNgQAPMBOaTPgWohd4c_s1rcuMDy_Xc0oZf03Hja-hefwUnFt5ktEXSE_7Ktn3qld7-L_Od2A9lcCEJpQvC5TDaQwi9pT8elfmAEGFRPgzSt4FQjxicpVF2D5rHg1xrbgiXSwr55NKcMaTCFshSzlUUIKg7R7zxFAr-BRs0xQjQRZoKPsqThafZ1CA_6s1_qZJMP0RjFRQK_dry86qATyjVJeJl-sOan8RwuWbidLb31HTqOS5ZJe7J_w";
pub const RSA_E: &str = "AQAB";

pub fn primary_jwk() -> JsonWebKey {
    JsonWebKey::rsa(PRIMARY_KID, PRIMARY_N, RSA_E)
}

pub fn published_keys() -> KeySet {
    KeySet {
        keys: vec![primary_jwk()],
    }
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Claims an identity provider would issue for the image API.
pub fn claims_with(permissions: &[&str]) -> Value {
    json!({
        "iss": ISSUER,
        "sub": "auth0|653f9b1918d81877fbb1de8d",
        "aud": AUDIENCE,
        "iat": now(),
        "exp": now() + 3600,
        "azp": "fA2qQe9bYrZe8HbXrRwwya1c9WVheBr0",
        "scope": "",
        "permissions": permissions,
    })
}

pub fn sign_with(pem: &str, kid: Option<&str>, claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.typ = Some("JWT".to_string());
    header.kid = kid.map(str::to_string);

    let key = EncodingKey::from_rsa_pem(pem.as_bytes()).expect("fixture key");
    jsonwebtoken::encode(&header, claims, &key).expect("sign")
}

/// RS256 token signed by the published key.
pub fn sign(claims: &Value) -> String {
    sign_with(PRIMARY_PRIVATE_PEM, Some(PRIMARY_KID), claims)
}

pub fn config_for(server: &MockServer) -> AuthorizerConfig {
    let mut config = AuthorizerConfig::new(DOMAIN, AUDIENCE);
    config.jwks_url = Some(format!("{}{}", server.uri(), JWKS_PATH));
    config
}

pub fn authorizer_for(server: &MockServer) -> Arc<Authorizer> {
    Arc::new(Authorizer::from_config(&config_for(server)).expect("authorizer"))
}

/// Serve `keys` at the JWKS path.
pub async fn mount_jwks(server: &MockServer, keys: &KeySet) {
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(keys))
        .mount(server)
        .await;
}

pub async fn jwks_server() -> MockServer {
    let server = MockServer::start().await;
    mount_jwks(&server, &published_keys()).await;
    server
}
