//! Client behavior against a loopback HTTP fixture.
//!
//! Each test gets its own `TcpListener` serving a fixed sequence of canned
//! responses; the fixture records every request so assertions can check the
//! path, query, and body the client actually sent.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use serde_json::json;

use weft_api::auth;
use weft_api::fabric::{EnsureOutcome, FabricClient, GitConnectOutcome, GitLink};
use weft_api::github::GithubClient;
use weft_api::ApiError;
use weft_core::config::{RepoSlug, ServicePrincipal};
use weft_core::types::{WorkspaceId, WorkspaceName};

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

struct CannedResponse {
    status: u16,
    body: String,
}

fn canned(status: u16, body: impl ToString) -> CannedResponse {
    CannedResponse {
        status,
        body: body.to_string(),
    }
}

#[derive(Debug)]
struct Recorded {
    request_line: String,
    body: String,
}

/// Serve `responses` in order, one connection each, recording each request.
fn serve(responses: Vec<CannedResponse>) -> (String, Receiver<Recorded>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for response in responses {
            let (stream, _) = listener.accept().expect("accept");
            let recorded = handle(stream, &response);
            tx.send(recorded).expect("record request");
        }
    });

    (format!("http://{addr}"), rx)
}

fn handle(stream: TcpStream, response: &CannedResponse) -> Recorded {
    let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

    let mut request_line = String::new();
    reader.read_line(&mut request_line).expect("request line");

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).expect("header line");
        if line == "\r\n" || line.is_empty() {
            break;
        }
        if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
            content_length = value.trim().parse().expect("content-length value");
        }
    }

    let mut body = vec![0u8; content_length];
    if content_length > 0 {
        reader.read_exact(&mut body).expect("request body");
    }

    let reason = match response.status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        403 => "Forbidden",
        _ => "Status",
    };
    let payload = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        reason,
        response.body.len(),
        response.body,
    );
    let mut stream = stream;
    stream.write_all(payload.as_bytes()).expect("write response");
    stream.flush().expect("flush response");

    Recorded {
        request_line: request_line.trim_end().to_owned(),
        body: String::from_utf8_lossy(&body).into_owned(),
    }
}

fn principal() -> ServicePrincipal {
    ServicePrincipal {
        client_id: "client-1".into(),
        client_secret: "secret-1".into(),
        tenant_id: "tenant-1".into(),
    }
}

fn repo() -> RepoSlug {
    RepoSlug::parse("acme/data-platform").expect("slug")
}

fn link() -> GitLink {
    GitLink {
        owner: "acme".into(),
        repository: "data-platform".into(),
        branch: "main".into(),
        directory: "/".into(),
        connection_id: "conn-1".into(),
    }
}

// ---------------------------------------------------------------------------
// Token grant
// ---------------------------------------------------------------------------

#[test]
fn fetch_token_posts_form_and_parses_access_token() {
    let (base, rx) = serve(vec![canned(
        200,
        json!({"token_type": "Bearer", "expires_in": 3599, "access_token": "tok-123"}),
    )]);

    let token = auth::fetch_token(&base, &principal()).expect("token");
    assert_eq!(token, "tok-123");

    let recorded = rx.recv().expect("recorded");
    assert!(
        recorded
            .request_line
            .starts_with("POST /tenant-1/oauth2/v2.0/token"),
        "unexpected request line: {}",
        recorded.request_line
    );
    assert!(recorded.body.contains("client_id=client-1"));
    assert!(recorded.body.contains("grant_type=client_credentials"));
}

#[test]
fn token_response_without_access_token_is_an_error() {
    let (base, _rx) = serve(vec![canned(200, json!({"token_type": "Bearer"}))]);
    let err = auth::fetch_token(&base, &principal()).unwrap_err();
    assert!(matches!(err, ApiError::MissingToken));
}

// ---------------------------------------------------------------------------
// GitHub variables
// ---------------------------------------------------------------------------

#[test]
fn list_repo_variables_fetches_a_single_page() {
    let (base, rx) = serve(vec![canned(
        200,
        json!({"total_count": 2, "variables": [
            {"name": "vt_dev_A", "value": "1"},
            {"name": "vt_dev_B", "value": "2"},
        ]}),
    )]);

    let vars = GithubClient::with_base_url(base, "gh-token")
        .list_repo_variables(&repo())
        .expect("variables");
    assert_eq!(vars.len(), 2);
    assert_eq!(vars[0].name, "vt_dev_A");

    let recorded = rx.recv().expect("recorded");
    assert!(recorded
        .request_line
        .starts_with("GET /repos/acme/data-platform/actions/variables"));
    assert!(recorded.request_line.contains("per_page=100"));
    assert!(recorded.request_line.contains("page=1"));
}

#[test]
fn list_repo_variables_follows_pages_until_a_short_one() {
    let page = |names: Vec<String>| {
        json!({
            "total_count": 105,
            "variables": names
                .into_iter()
                .map(|n| json!({"name": n, "value": "v"}))
                .collect::<Vec<_>>(),
        })
    };
    let first: Vec<String> = (0..100).map(|i| format!("VAR_{i:03}")).collect();
    let second: Vec<String> = (100..105).map(|i| format!("VAR_{i:03}")).collect();
    let (base, rx) = serve(vec![canned(200, page(first)), canned(200, page(second))]);

    let vars = GithubClient::with_base_url(base, "gh-token")
        .list_repo_variables(&repo())
        .expect("variables");
    assert_eq!(vars.len(), 105);
    assert_eq!(vars[104].name, "VAR_104");

    assert!(rx.recv().expect("first").request_line.contains("page=1"));
    assert!(rx.recv().expect("second").request_line.contains("page=2"));
}

// ---------------------------------------------------------------------------
// Fabric workspaces
// ---------------------------------------------------------------------------

#[test]
fn list_workspaces_follows_the_continuation_token() {
    let (base, rx) = serve(vec![
        canned(
            200,
            json!({"value": [{"id": "ws-1", "displayName": "one"}], "continuationToken": "tok-a"}),
        ),
        canned(200, json!({"value": [{"id": "ws-2", "displayName": "two"}]})),
    ]);

    let all = FabricClient::with_base_url(base, "token")
        .list_workspaces()
        .expect("workspaces");
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].id, WorkspaceId::from("ws-2"));

    let _first = rx.recv().expect("first");
    let second = rx.recv().expect("second");
    assert!(
        second.request_line.contains("continuationToken=tok-a"),
        "continuation token missing from: {}",
        second.request_line
    );
}

#[test]
fn ensure_workspace_creates_when_lookup_misses() {
    let (base, rx) = serve(vec![
        canned(200, json!({"value": [{"id": "ws-0", "displayName": "other"}]})),
        canned(201, json!({"id": "ws-new", "displayName": "proj-main"})),
    ]);

    let outcome = FabricClient::with_base_url(base, "token")
        .ensure_workspace(&WorkspaceName::from("proj-main"), "cap-1")
        .expect("ensure");
    assert_eq!(outcome, EnsureOutcome::Created(WorkspaceId::from("ws-new")));

    let _list = rx.recv().expect("list");
    let create = rx.recv().expect("create");
    assert!(create.request_line.starts_with("POST /workspaces"));
    assert!(create.body.contains(r#""displayName":"proj-main""#));
    assert!(create.body.contains(r#""capacityId":"cap-1""#));
}

#[test]
fn ensure_workspace_reuses_an_exact_match() {
    let (base, _rx) = serve(vec![canned(
        200,
        json!({"value": [
            {"id": "ws-a", "displayName": "proj-main"},
            {"id": "ws-b", "displayName": "proj-main-old"},
        ]}),
    )]);

    let outcome = FabricClient::with_base_url(base, "token")
        .ensure_workspace(&WorkspaceName::from("proj-main"), "cap-1")
        .expect("ensure");
    assert_eq!(outcome, EnsureOutcome::Existing(WorkspaceId::from("ws-a")));
}

// ---------------------------------------------------------------------------
// Git connect
// ---------------------------------------------------------------------------

#[test]
fn connect_git_success_posts_provider_details() {
    let (base, rx) = serve(vec![canned(200, json!({}))]);

    let outcome = FabricClient::with_base_url(base, "token")
        .connect_git(&WorkspaceId::from("ws-1"), &link())
        .expect("connect");
    assert_eq!(outcome, GitConnectOutcome::Connected);

    let recorded = rx.recv().expect("recorded");
    assert!(recorded
        .request_line
        .starts_with("POST /workspaces/ws-1/git/connect"));
    assert!(recorded.body.contains(r#""gitProviderType":"GitHub""#));
    assert!(recorded.body.contains(r#""connectionId":"conn-1""#));
}

#[test]
fn connect_git_treats_already_connected_as_success() {
    let (base, _rx) = serve(vec![canned(
        400,
        json!({"errorCode": "WorkspaceAlreadyConnectedToGit", "message": "already linked"}),
    )]);

    let outcome = FabricClient::with_base_url(base, "token")
        .connect_git(&WorkspaceId::from("ws-1"), &link())
        .expect("connect");
    assert_eq!(
        outcome,
        GitConnectOutcome::AlreadyConnected {
            code: "WorkspaceAlreadyConnectedToGit".into()
        }
    );
}

#[test]
fn connect_git_surfaces_other_errors_with_the_body() {
    let (base, _rx) = serve(vec![canned(
        403,
        json!({"errorCode": "InsufficientPrivileges", "message": "nope"}),
    )]);

    let err = FabricClient::with_base_url(base, "token")
        .connect_git(&WorkspaceId::from("ws-1"), &link())
        .unwrap_err();
    match err {
        ApiError::Status { status, body, .. } => {
            assert_eq!(status, 403);
            assert!(body.contains("InsufficientPrivileges"));
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}
