//! Development server for `--serve`.
//!
//! Grounded on `original_source/main.go`'s server: `/` answers with the
//! already-rendered document, `/fonts/*` and `/public/*` are served
//! straight off disk. `tiny_http` is a fresh import — the teacher crate
//! has no server of its own to generalize, and this is the
//! smallest-dependency HTTP server present anywhere in the retrieval
//! pack.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use tiny_http::{Header, Response, Server};

use crate::error::BeError;

/// Serve `html` at `/`, plus static assets under `fonts_dir` and
/// `public_dir`, until the process is interrupted.
pub fn serve(html: &str, fonts_dir: &Path, public_dir: &Path, addr: &str) -> Result<(), BeError> {
    let server = Server::http(addr).map_err(|e| {
        BeError::Io(std::io::Error::new(std::io::ErrorKind::AddrInUse, e.to_string()))
    })?;
    info!("serving on http://{addr}");

    for request in server.incoming_requests() {
        let url = request.url().to_string();
        let response = if url == "/" || url.is_empty() {
            html_response(html)
        } else if let Some(rest) = url.strip_prefix("/fonts/") {
            file_response(fonts_dir, rest)
        } else if let Some(rest) = url.strip_prefix("/public/") {
            file_response(public_dir, rest)
        } else {
            not_found()
        };

        if let Err(e) = request.respond(response) {
            warn!("failed to write response: {e}");
        }
    }
    Ok(())
}

fn html_response(html: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    let header = Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..])
        .expect("static header is valid ASCII");
    Response::from_string(html.to_string()).with_header(header)
}

fn file_response(root: &Path, rest: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    if rest.split('/').any(|segment| segment == "..") {
        return not_found();
    }
    let path: PathBuf = root.join(rest);
    match fs::read(&path) {
        Ok(bytes) => Response::from_data(bytes),
        Err(_) => not_found(),
    }
}

fn not_found() -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string("not found").with_status_code(404)
}
