//! Checks that hero video files exist on disk, on the local dev server and on
//! the deployed site, and that none of them were truncated on upload.

use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

use reqwest::header::CONTENT_LENGTH;
use serde::Serialize;

use crate::types::VideoConfig;

/// Anything this small is a truncated upload, not a video
pub const MIN_VIDEO_BYTES: u64 = 1000;

const BYPASS_HEADER: &str = "x-vercel-protection-bypass";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum LocalCheck {
    Present { bytes: u64 },
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum RemoteCheck {
    Ok { bytes: u64 },
    Truncated { bytes: u64 },
    HttpStatus { code: u16 },
    Error { message: String },
    Timeout,
}

impl RemoteCheck {
    pub fn is_ok(&self) -> bool {
        matches!(self, RemoteCheck::Ok { .. })
    }
}

fn megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Classify a HEAD response.
pub fn classify_head(status: u16, content_length: Option<u64>) -> RemoteCheck {
    if status != 200 {
        return RemoteCheck::HttpStatus { code: status };
    }
    let bytes = content_length.unwrap_or(0);
    if bytes > MIN_VIDEO_BYTES {
        RemoteCheck::Ok { bytes }
    } else {
        RemoteCheck::Truncated { bytes }
    }
}

/// Size of `source` under `root` (source paths are site-absolute, e.g. `/videos/x.mp4`).
pub async fn verify_local(root: &Path, source: &str) -> LocalCheck {
    let path = root.join(source.trim_start_matches('/'));
    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {
            log::info!("Local: {} - {}", source, megabytes(meta.len()));
            LocalCheck::Present { bytes: meta.len() }
        }
        _ => {
            log::warn!("Local: {} - not found", source);
            LocalCheck::Missing
        }
    }
}

/// HEAD `base + source`. The client's own timeout bounds the request.
pub async fn verify_remote(
    client: &reqwest::Client,
    base: &str,
    source: &str,
    bypass_secret: Option<&str>,
) -> RemoteCheck {
    let url = format!("{}{}", base.trim_end_matches('/'), source);
    let mut req = client.head(&url);
    if let Some(secret) = bypass_secret {
        req = req.header(BYPASS_HEADER, secret);
    }

    let check = match req.send().await {
        Ok(resp) => {
            let length = resp
                .headers()
                .get(CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            classify_head(resp.status().as_u16(), length)
        }
        Err(e) if e.is_timeout() => RemoteCheck::Timeout,
        Err(e) => RemoteCheck::Error {
            message: e.to_string(),
        },
    };

    match &check {
        RemoteCheck::Ok { bytes } => log::info!("Remote: {} - {}", url, megabytes(*bytes)),
        RemoteCheck::Truncated { bytes } => {
            log::warn!("Remote: {} - {} bytes (corrupted/truncated)", url, bytes)
        }
        RemoteCheck::HttpStatus { code } => log::warn!("Remote: {} - HTTP {}", url, code),
        RemoteCheck::Error { message } => log::warn!("Remote: {} - error: {}", url, message),
        RemoteCheck::Timeout => log::warn!("Remote: {} - timeout", url),
    }
    check
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReport {
    pub source: String,
    pub local: LocalCheck,
    pub local_server: RemoteCheck,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployed: Option<RemoteCheck>,
}

impl SourceReport {
    /// The deployed check when a deployment was probed, else the dev server.
    fn served(&self) -> &RemoteCheck {
        self.deployed.as_ref().unwrap_or(&self.local_server)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DeploymentVerdict {
    AllDeployed,
    PartialDeployment,
    DeploymentBroken,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub sources: Vec<SourceReport>,
}

impl VerificationReport {
    pub fn local_ok(&self) -> usize {
        self.sources
            .iter()
            .filter(|s| matches!(s.local, LocalCheck::Present { .. }))
            .count()
    }

    pub fn local_server_ok(&self) -> usize {
        self.sources.iter().filter(|s| s.local_server.is_ok()).count()
    }

    pub fn served_ok(&self) -> usize {
        self.sources.iter().filter(|s| s.served().is_ok()).count()
    }

    pub fn verdict(&self) -> DeploymentVerdict {
        let ok = self.served_ok();
        if ok == 0 {
            DeploymentVerdict::DeploymentBroken
        } else if ok < self.sources.len() {
            DeploymentVerdict::PartialDeployment
        } else {
            DeploymentVerdict::AllDeployed
        }
    }

    /// First source that is actually being served; what playback should start with.
    pub fn first_playable(&self) -> Option<&str> {
        self.sources
            .iter()
            .find(|s| s.served().is_ok())
            .map(|s| s.source.as_str())
    }

    pub fn render_text(&self) -> String {
        let total = self.sources.len();
        let mut out = String::new();
        let mark = |ok: bool| if ok { "ok" } else { "FAIL" };

        for s in &self.sources {
            let _ = writeln!(out, "{}:", s.source);
            let local = match &s.local {
                LocalCheck::Present { bytes } => format!("ok ({})", megabytes(*bytes)),
                LocalCheck::Missing => "FAIL".to_string(),
            };
            let _ = writeln!(out, "  Local:    {}", local);
            let _ = writeln!(out, "  Remote:   {}", mark(s.local_server.is_ok()));
            if let Some(deployed) = &s.deployed {
                let detail = match deployed {
                    RemoteCheck::Ok { bytes } => format!("ok ({})", megabytes(*bytes)),
                    RemoteCheck::Truncated { .. } => "FAIL (corrupted)".to_string(),
                    _ => "FAIL".to_string(),
                };
                let _ = writeln!(out, "  Deployed: {}", detail);
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Local files: {}/{} working", self.local_ok(), total);
        let _ = writeln!(out, "Remote files: {}/{} working", self.local_server_ok(), total);
        if self.sources.iter().any(|s| s.deployed.is_some()) {
            let _ = writeln!(out, "Deployed files: {}/{} working", self.served_ok(), total);
        }

        match self.verdict() {
            DeploymentVerdict::DeploymentBroken => {
                let _ = writeln!(out, "\nVideo deployment issue detected. Re-deploy, move the files to a CDN, or rely on the fallback image.");
            }
            DeploymentVerdict::PartialDeployment => {
                let _ = writeln!(out, "\nPartial video deployment detected. Playback will fall back to the working sources.");
            }
            DeploymentVerdict::AllDeployed => {
                let _ = writeln!(out, "\nAll videos deployed successfully.");
            }
        }
        out
    }
}

/// Check every configured source locally, against the dev server and (when
/// configured) against the deployment.
pub async fn verify_all(
    video: &VideoConfig,
    timeout: Duration,
    bypass_secret: Option<&str>,
) -> Result<VerificationReport, reqwest::Error> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let root = Path::new(&video.local_root);

    let mut sources = Vec::with_capacity(video.sources.len());
    for source in &video.sources {
        let local = verify_local(root, source).await;
        let local_server = verify_remote(&client, &video.local_base_url, source, None).await;
        let deployed = match &video.deployed_base_url {
            Some(base) => Some(verify_remote(&client, base, source, bypass_secret).await),
            None => None,
        };
        sources.push(SourceReport {
            source: source.clone(),
            local,
            local_server,
            deployed,
        });
    }
    Ok(VerificationReport { sources })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(deployed: &[RemoteCheck]) -> VerificationReport {
        VerificationReport {
            sources: deployed
                .iter()
                .enumerate()
                .map(|(i, check)| SourceReport {
                    source: format!("/videos/{i}.mp4"),
                    local: LocalCheck::Missing,
                    local_server: RemoteCheck::Timeout,
                    deployed: Some(check.clone()),
                })
                .collect(),
        }
    }

    #[test]
    fn test_classify_head() {
        assert_eq!(classify_head(200, Some(5_000_000)), RemoteCheck::Ok { bytes: 5_000_000 });
        assert_eq!(classify_head(200, Some(1000)), RemoteCheck::Truncated { bytes: 1000 });
        assert_eq!(classify_head(200, None), RemoteCheck::Truncated { bytes: 0 });
        assert_eq!(classify_head(404, Some(5_000_000)), RemoteCheck::HttpStatus { code: 404 });
    }

    #[tokio::test]
    async fn test_verify_local() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("videos")).expect("mkdir");
        std::fs::write(dir.path().join("videos").join("a.mp4"), vec![0u8; 2048]).expect("write");

        assert_eq!(
            verify_local(dir.path(), "/videos/a.mp4").await,
            LocalCheck::Present { bytes: 2048 }
        );
        assert_eq!(verify_local(dir.path(), "/videos/b.mp4").await, LocalCheck::Missing);
        assert_eq!(verify_local(dir.path(), "/videos").await, LocalCheck::Missing);
    }

    #[test]
    fn test_verdicts_and_first_playable() {
        let all = report(&[RemoteCheck::Ok { bytes: 2000 }, RemoteCheck::Ok { bytes: 3000 }]);
        assert_eq!(all.verdict(), DeploymentVerdict::AllDeployed);
        assert_eq!(all.first_playable(), Some("/videos/0.mp4"));

        let partial = report(&[RemoteCheck::Truncated { bytes: 12 }, RemoteCheck::Ok { bytes: 3000 }]);
        assert_eq!(partial.verdict(), DeploymentVerdict::PartialDeployment);
        assert_eq!(partial.first_playable(), Some("/videos/1.mp4"));
        assert!(partial.render_text().contains("Deployed files: 1/2 working"));

        let broken = report(&[RemoteCheck::HttpStatus { code: 500 }, RemoteCheck::Timeout]);
        assert_eq!(broken.verdict(), DeploymentVerdict::DeploymentBroken);
        assert_eq!(broken.first_playable(), None);
    }

    #[test]
    fn test_without_deployment_dev_server_decides() {
        let report = VerificationReport {
            sources: vec![SourceReport {
                source: "/videos/a.mp4".to_string(),
                local: LocalCheck::Present { bytes: 4096 },
                local_server: RemoteCheck::Ok { bytes: 4096 },
                deployed: None,
            }],
        };
        assert_eq!(report.verdict(), DeploymentVerdict::AllDeployed);
        assert!(!report.render_text().contains("Deployed files"));
    }
}
