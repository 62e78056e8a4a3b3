use wip_bridge::oauth::OAuth1Signer;
use wip_bridge_core::contract::RequestSigner;

fn docs_signer() -> OAuth1Signer {
    OAuth1Signer::new(
        "xvz1evFS4wEEPTGEFPHBog",
        "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
        "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
        "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
    )
}

/// Known-answer check against the worked example in Twitter's OAuth documentation.
#[test]
fn signature_matches_published_example() {
    let header = docs_signer()
        .authorization_with(
            "POST",
            "https://api.twitter.com/1.1/statuses/update.json?include_entities=true",
            &[(
                "status".to_string(),
                "Hello Ladies + Gentlemen, a signed OAuth request!".to_string(),
            )],
            "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg",
            1318622958,
        )
        .expect("signing succeeds");

    assert!(header.starts_with("OAuth "), "{header}");
    assert!(
        header.contains(r#"oauth_signature="hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D""#),
        "{header}"
    );
    assert!(header.contains(r#"oauth_consumer_key="xvz1evFS4wEEPTGEFPHBog""#));
    assert!(header.contains(r#"oauth_signature_method="HMAC-SHA1""#));
    assert!(header.contains(r#"oauth_timestamp="1318622958""#));
    assert!(header.contains(r#"oauth_version="1.0""#));
}

#[test]
fn body_parameters_change_the_signature() {
    let signer = docs_signer();
    let url = "https://upload.twitter.com/1.1/media/upload.json";
    let sign = |data: &str| {
        signer
            .authorization_with(
                "POST",
                url,
                &[("media_data".to_string(), data.to_string())],
                "nonce",
                1_700_000_000,
            )
            .unwrap()
    };

    assert_ne!(sign("aGVsbG8="), sign("d29ybGQ="));
}

#[test]
fn fresh_nonce_per_request() {
    let signer = docs_signer();
    let url = "https://api.twitter.com/2/tweets";

    let first = signer.authorization("POST", url, &[]).unwrap();
    let second = signer.authorization("POST", url, &[]).unwrap();

    assert_ne!(first, second);
}

#[test]
fn relative_url_is_rejected() {
    let err = docs_signer().authorization("POST", "/2/tweets", &[]);
    assert!(err.is_err());
}
