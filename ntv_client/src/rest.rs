use serde::de::DeserializeOwned;
use serde::Serialize;

fn url_fixup(base: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    if base.ends_with("/api") {
        base.to_string()
    } else {
        format!("{base}/api")
    }
}

/// GET an endpoint under the daemon's `/api` prefix, deserializing the JSON
/// body into `T`.
pub async fn api_get<T>(base: &str, endpoint: &str) -> Result<T, reqwest::Error>
where
    T: DeserializeOwned,
{
    let full_url = format!("{}/{}", url_fixup(base), endpoint);
    log::debug!("GET {full_url}");
    let client = reqwest::Client::new();

    let res = client
        .get(&full_url)
        .header("Content-Type", "application/json")
        .send()
        .await?;

    res.json::<T>().await
}

/// POST a JSON body to an endpoint under the daemon's `/api` prefix.
pub async fn api_post<B, T>(base: &str, endpoint: &str, body: &B) -> Result<T, reqwest::Error>
where
    B: Serialize,
    T: DeserializeOwned,
{
    let full_url = format!("{}/{}", url_fixup(base), endpoint);
    log::debug!("POST {full_url}");
    let client = reqwest::Client::new();

    let res = client.post(&full_url).json(body).send().await?;

    res.json::<T>().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_fixup_adds_path_when_missing() {
        assert_eq!(url_fixup("http://127.0.0.1:5000"), "http://127.0.0.1:5000/api");
    }

    #[test]
    fn test_url_fixup_removes_trailing_slash() {
        assert_eq!(url_fixup("http://127.0.0.1:5000/"), "http://127.0.0.1:5000/api");
    }

    #[test]
    fn test_url_fixup_keeps_existing_path() {
        assert_eq!(url_fixup("http://127.0.0.1:5000/api"), "http://127.0.0.1:5000/api");
    }

    #[test]
    fn test_url_fixup_trims_whitespace() {
        assert_eq!(url_fixup("  http://host:5000  "), "http://host:5000/api");
    }
}
