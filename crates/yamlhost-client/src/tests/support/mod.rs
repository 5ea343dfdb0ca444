//! Scripted stand-in for the YAML analysis server.
//!
//! The fixture installs a small shell script that speaks Content-Length
//! framed JSON-RPC over stdio. It answers the `initialize` request by
//! echoing the request id it parsed from the frame, consumes the
//! `initialized` notification, and then follows one of two scripts:
//! `exchange` captures the next client notification to disk, issues a
//! `custom/schema/request`, and captures the client's reply; `hangup`
//! exits straight after the handshake so EOF behaviour can be observed.

use std::fs;
use std::os::unix::fs::PermissionsExt;

use tempfile::TempDir;

use crate::config::ServerConfig;

const SERVER_SCRIPT: &str = r#"#!/bin/sh
mode=$1
capture_dir=$2

read_frame() {
    length=0
    while IFS= read -r header; do
        header=$(printf '%s' "$header" | tr -d '\r')
        if [ -z "$header" ]; then
            break
        fi
        case "$header" in
            Content-Length:*) length=${header#*: } ;;
        esac
    done
    if [ "$length" -gt 0 ]; then
        head -c "$length"
    fi
}

send_frame() {
    printf 'Content-Length: %s\r\n\r\n%s' "${#1}" "$1"
}

init=$(read_frame)
if [ -z "$init" ]; then
    exit 1
fi
request_id=$(printf '%s' "$init" | sed -n 's/^{"jsonrpc":"2.0","id":\([0-9][0-9]*\).*/\1/p')
if [ -z "$request_id" ]; then
    exit 1
fi
send_frame "{\"jsonrpc\":\"2.0\",\"id\":${request_id},\"result\":{\"capabilities\":{},\"serverInfo\":{\"name\":\"scripted-yaml-server\"}}}"

read_frame >/dev/null

if [ "$mode" = "hangup" ]; then
    exit 0
fi

read_frame >"${capture_dir}/notification.json"
send_frame '{"jsonrpc":"2.0","id":77,"method":"custom/schema/request","params":"file:///deploy.yaml"}'
read_frame >"${capture_dir}/reply.json"

cat >/dev/null
exit 0
"#;

/// Scripted server installed into a temporary directory.
pub struct ScriptedServer {
    dir: TempDir,
}

impl ScriptedServer {
    /// Writes the server script and marks it executable.
    pub fn install() -> Self {
        let dir = tempfile::tempdir().expect("failed to create fixture directory");
        let script = dir.path().join("scripted-server.sh");
        fs::write(&script, SERVER_SCRIPT).expect("failed to write server script");

        let mut permissions = fs::metadata(&script)
            .expect("failed to stat server script")
            .permissions();
        permissions.set_mode(0o755);
        fs::set_permissions(&script, permissions).expect("failed to mark script executable");

        Self { dir }
    }

    /// Builds a launch configuration running the script in `mode`.
    pub fn config(&self, mode: &str) -> ServerConfig {
        ServerConfig {
            command: self.dir.path().join("scripted-server.sh"),
            args: vec![mode.to_owned(), self.dir.path().display().to_string()],
            working_dir: None,
        }
    }

    /// Reads a frame the script captured to disk.
    pub fn capture(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).expect("capture file missing")
    }
}
