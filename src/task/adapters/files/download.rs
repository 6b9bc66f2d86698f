//! Remote image download into the input root.

use crate::task::ports::{AcquisitionError, AcquisitionResult};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use reqwest::header::{ACCEPT, LOCATION, REFERER, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

/// Some image hosts reject requests with blank or library user agents.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/96.0.4664.110 Safari/537.36";
const IMAGE_ACCEPT: &str = "image/webp,image/apng,image/*,*/*;q=0.8";
const PARTIAL_SUFFIX: &str = ".part";

/// Downloads `url`, following redirects up to `max_redirects`, into
/// `input_root`. Returns the absolute path of the stored file.
pub(super) async fn download(
    client: &Client,
    input_root: &Utf8Path,
    url: Url,
    max_redirects: usize,
) -> AcquisitionResult<Utf8PathBuf> {
    let mut current = url;
    let mut followed = 0_usize;

    loop {
        let response = request(client, &current).await?;
        let status = response.status();

        if is_followed_redirect(status) {
            if followed >= max_redirects {
                return Err(AcquisitionError::TooManyRedirects {
                    url: current.to_string(),
                    limit: max_redirects,
                });
            }
            let next = redirect_target(&current, &response)?;
            debug!(from = %current, to = %next, status = status.as_u16(), "following redirect");
            current = next;
            followed += 1;
            continue;
        }

        if !status.is_success() {
            return Err(AcquisitionError::UnexpectedStatus {
                url: current.to_string(),
                status: status.as_u16(),
            });
        }

        let file_name = file_name_from_url(&current)?;
        return store(input_root, &file_name, response).await;
    }
}

async fn request(client: &Client, url: &Url) -> AcquisitionResult<Response> {
    client
        .get(url.clone())
        .header(USER_AGENT, BROWSER_USER_AGENT)
        .header(ACCEPT, IMAGE_ACCEPT)
        .header(REFERER, url.origin().ascii_serialization())
        .send()
        .await
        .map_err(AcquisitionError::transport)
}

const fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

fn redirect_target(current: &Url, response: &Response) -> AcquisitionResult<Url> {
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AcquisitionError::InvalidRedirect(current.to_string()))?;
    let next = current
        .join(location)
        .map_err(|_| AcquisitionError::InvalidRedirect(current.to_string()))?;
    if !is_remote(&next) {
        return Err(AcquisitionError::InvalidRedirect(current.to_string()));
    }
    Ok(next)
}

/// Returns whether `url` is fetched over the network.
pub(super) fn is_remote(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Returns the final, non-empty path segment of `url`.
pub(super) fn file_name_from_url(url: &Url) -> AcquisitionResult<String> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .map(str::to_owned)
        .ok_or_else(|| AcquisitionError::MissingFileName(url.to_string()))
}

/// Streams the body into a partial file unique to this download and
/// renames it onto `file_name` on success. The partial file is removed on
/// any failure, including a failed rename.
async fn store(
    input_root: &Utf8Path,
    file_name: &str,
    response: Response,
) -> AcquisitionResult<Utf8PathBuf> {
    Dir::create_ambient_dir_all(input_root, ambient_authority())?;
    let dir = Dir::open_ambient_dir(input_root, ambient_authority())?;
    let partial_name = partial_file_name(file_name);

    let stored = match write_body(&dir, &partial_name, response).await {
        Ok(()) => dir
            .rename(&partial_name, &dir, file_name)
            .map_err(AcquisitionError::from),
        Err(err) => Err(err),
    };

    match stored {
        Ok(()) => Ok(input_root.join(file_name)),
        Err(err) => {
            if let Err(cleanup) = dir.remove_file(&partial_name) {
                warn!(
                    path = %input_root.join(&partial_name),
                    error = %cleanup,
                    "failed to remove partial download"
                );
            }
            Err(err)
        }
    }
}

/// Concurrent downloads of the same name each stream into their own file.
fn partial_file_name(file_name: &str) -> String {
    format!("{file_name}.{}{PARTIAL_SUFFIX}", Uuid::new_v4().simple())
}

async fn write_body(dir: &Dir, partial_name: &str, mut response: Response) -> AcquisitionResult<()> {
    let mut file = tokio::fs::File::from_std(dir.create(partial_name)?.into_std());
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(AcquisitionError::transport)?
    {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(())
}
