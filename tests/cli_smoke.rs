use assert_cmd::Command;
use predicates::str::contains;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn daisy_cmd(config_home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("daisy").expect("binary");
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("DAISY_CONFIG")
        .env_remove("DAISY_API_URL")
        .env_remove("DAISY_PASSWORD");
    cmd
}

#[test]
fn daisy_help_works() {
    Command::cargo_bin("daisy")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("personal task planner"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "login", "register", "logout", "whoami", "profile", "planner", "task", "day", "week",
        "month", "weather",
    ];

    for cmd in subcommands {
        Command::cargo_bin("daisy")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn logged_out_commands_exit_with_auth_code() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempfile::tempdir()?;

    daisy_cmd(home.path())
        .args(["planner", "ls"])
        .assert()
        .code(3)
        .stderr(contains("Not logged in"))
        .stderr(contains("daisy login"));

    Ok(())
}

#[test]
fn json_errors_carry_the_envelope() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempfile::tempdir()?;

    daisy_cmd(home.path())
        .args(["--json", "whoami"])
        .assert()
        .code(3)
        .stdout(contains("daisy.v1"))
        .stdout(contains("auth_required"));

    Ok(())
}

#[test]
fn invalid_date_is_a_user_error() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempfile::tempdir()?;
    // The date is validated before any backend call, so no server needed,
    // but a session token must exist to get past the login check.
    std::fs::create_dir_all(home.path().join("daisy"))?;
    std::fs::write(home.path().join("daisy").join("session"), "tok")?;

    daisy_cmd(home.path())
        .args(["task", "add", "Work", "milk", "--date", "06/01/2024"])
        .assert()
        .code(2)
        .stderr(contains("invalid date"));

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn login_persists_a_session_used_by_later_commands(
) -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Login successful",
            "token": "jwt-token",
            "user": {
                "id": 1,
                "username": "alice",
                "email": "alice@example.com",
                "location": null
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/planners"))
        .and(header("Authorization", "Bearer jwt-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "id": 7,
            "name": "Chores",
            "view_type": "weekly",
            "created_at": "2024-06-01T10:00:00"
        }])))
        .mount(&server)
        .await;

    let home = tempfile::tempdir()?;
    let config_home = home.path().to_path_buf();
    let uri = server.uri();

    tokio::task::spawn_blocking(move || {
        daisy_cmd(&config_home)
            .env("DAISY_API_URL", &uri)
            .env("DAISY_PASSWORD", "hunter2")
            .args(["login", "alice@example.com"])
            .assert()
            .success()
            .stdout(contains("Logged in as alice"));

        // The stored token carries over to the next invocation.
        daisy_cmd(&config_home)
            .env("DAISY_API_URL", &uri)
            .args(["planner", "ls"])
            .assert()
            .success()
            .stdout(contains("Chores"));

        // Logout forgets it again.
        daisy_cmd(&config_home)
            .arg("logout")
            .assert()
            .success()
            .stdout(contains("Logged out"));

        daisy_cmd(&config_home)
            .env("DAISY_API_URL", &uri)
            .args(["planner", "ls"])
            .assert()
            .code(3);
    })
    .await?;

    Ok(())
}
