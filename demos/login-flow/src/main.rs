use chrono::Duration;
use tollgate::prelude::*;

/// Used when no config path is passed on the command line.
const DEFAULT_CONFIG: &str = r#"
[signer]
secret = "login-flow-demo"

[sessions]
max_sessions_per_user = 3

[logging]
filters = ["tollgate_session=debug"]
"#;

// ---------------------------------------------------------------------------
// Flow
// ---------------------------------------------------------------------------

/// Logs `user` in until the cap refuses a new session. Returns the signs
/// that were issued.
async fn log_in_until_refused(
    auth: &impl Authenticator,
    user: &UserId,
) -> Result<Vec<String>, TollgateError> {
    let mut signs = Vec::new();
    loop {
        let token = Token::issue(user, Duration::minutes(30));
        match auth.generate_sign(&token).await {
            Ok(sign) => {
                println!("login #{} for {user}: token {}", signs.len() + 1, token.id);
                signs.push(sign);
            }
            Err(err) if err.kind() == AuthErrorKind::MaxSessionsReached => {
                println!("login #{} for {user} refused: {err}", signs.len() + 1);
                return Ok(signs);
            }
            Err(err) => return Err(err.into()),
        }
    }
}

/// Validates `sign` and prints the outcome.
async fn check(auth: &impl Authenticator, label: &str, sign: &str) {
    match auth.validate_sign(sign).await {
        Ok(token) => println!("{label}: accepted, token {} expires {}", token.id, token.expire_date),
        Err(err) => println!("{label}: rejected ({}): {err}", err.kind()),
    }
}

#[tokio::main]
async fn main() -> Result<(), TollgateError> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::from_toml_str(DEFAULT_CONFIG)?,
    };
    init_logging(&config.logging)?;

    let auth = TollgateBuilder::from_config(&config).build(MemoryStore::new())?;
    tracing::info!(
        max_sessions_per_user = auth.registry().policy().max_sessions_per_user.get(),
        "login flow starting"
    );

    let alice = UserId::from("alice");
    let signs = log_in_until_refused(&auth, &alice).await?;

    if let Some(first) = signs.first() {
        check(&auth, "first sign", first).await;
    }
    check(&auth, "garbage sign", "not.a.jwt").await;

    // Signed with a foreign secret, so the signature check fails.
    let stranger = TollgateBuilder::new().secret("someone-else").build_stateless()?;
    let forged = stranger
        .generate_sign(&Token::issue(&alice, Duration::minutes(30)))
        .await?;
    check(&auth, "foreign sign", &forged).await;

    let live = auth.registry().live_sessions(&alice).await?;
    println!("{alice} holds {} live sessions", live.len());
    Ok(())
}
