//! Environment overrides for container/PaaS deployments.
//!
//! | variable                  | effect                                     |
//! |---------------------------|--------------------------------------------|
//! | `PORT`                    | replaces the port of `server.listen`       |
//! | `SECRET_TOKEN`            | `auth.secret_token`                        |
//! | `PERSIST_FILE`            | `counter.persist_file`                     |
//! | `ALLOWED_ORIGINS`         | comma-separated `cors.allowed_origins`     |
//! | `REDIS_URL`               | `store.redis_url`                          |
//! | `UPSTASH_REDIS_URL` + `UPSTASH_REDIS_PASSWORD` | `store.redis_url` when `REDIS_URL` is unset |
//! | `INITIAL_HIT_COUNT`       | `counter.initial_count` (ignored if not a u64) |
//!
//! Empty values count as unset.

use super::HitcountConfig;

pub fn apply_overrides<F>(cfg: &mut HitcountConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(port) = get("PORT") {
        match port.trim().parse::<u16>() {
            Ok(port) => cfg.server.listen = with_port(&cfg.server.listen, port),
            Err(_) => tracing::warn!(%port, "ignoring invalid PORT"),
        }
    }

    if let Some(token) = get("SECRET_TOKEN") {
        cfg.auth.secret_token = Some(token);
    }

    if let Some(path) = get("PERSIST_FILE") {
        cfg.counter.persist_file = Some(path);
    }

    if let Some(origins) = get("ALLOWED_ORIGINS") {
        let list: Vec<String> = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
        if !list.is_empty() {
            cfg.cors.allowed_origins = list;
        }
    }

    if let Some(url) = get("REDIS_URL") {
        cfg.store.redis_url = Some(url);
    } else if let (Some(host), Some(password)) =
        (get("UPSTASH_REDIS_URL"), get("UPSTASH_REDIS_PASSWORD"))
    {
        if let Some(url) = build_upstash_url(&host, &password) {
            cfg.store.redis_url = Some(url);
        }
    }

    if let Some(seed) = get("INITIAL_HIT_COUNT") {
        match seed.trim().parse::<u64>() {
            Ok(v) => cfg.counter.initial_count = v,
            Err(_) => tracing::warn!(%seed, "ignoring invalid INITIAL_HIT_COUNT"),
        }
    }
}

fn with_port(listen: &str, port: u16) -> String {
    let host = listen.rsplit_once(':').map(|(h, _)| h).unwrap_or("0.0.0.0");
    format!("{host}:{port}")
}

/// Combine an Upstash host (`host:port` or a full `redis[s]://` URL) with its
/// password into a connection URL. Bare hosts get `rediss://`; existing
/// credentials in the URL are kept.
pub fn build_upstash_url(raw_host: &str, password: &str) -> Option<String> {
    let raw_host = raw_host.trim();
    if raw_host.is_empty() || password.is_empty() {
        return None;
    }

    let (scheme, rest) = match raw_host.split_once("://") {
        Some((s @ ("redis" | "rediss"), rest)) => (s, rest),
        Some(_) => return None,
        None => ("rediss", raw_host),
    };
    if rest.is_empty() {
        return None;
    }

    let authority = rest.split('/').next().unwrap_or(rest);
    if authority.contains('@') {
        return Some(format!("{scheme}://{rest}"));
    }
    Some(format!("{scheme}://default:{}@{rest}", encode_userinfo(password)))
}

fn encode_userinfo(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}
