use std::{net::IpAddr, str::FromStr};

use actix_web::HttpRequest;
use hmac::{Hmac, Mac};
use log::{debug, info, trace, warn};
use regex::Regex;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Get the remote IP address from the request. It uses 3 sources to determine the IP address, in decreasing order
/// of preference:
/// 1. The `X-Forwarded-For` header, iif `use_x_forwarded_for` is set to true in the configuration.
/// 2. The `Forwarded` header, iif `use_forwarded` is set to true in the configuration.
/// 3. The peer address from the connection info.
pub fn get_remote_ip(req: &HttpRequest, use_x_forwarded_for: bool, use_forwarded: bool) -> Option<IpAddr> {
    let mut result = None;
    if use_x_forwarded_for {
        trace!("Checking X-Forwarded-For header");
        // Proxies append to the header, so the client is the first entry
        result = req
            .headers()
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| IpAddr::from_str(s.trim()).ok());
        if let Some(ip) = result {
            debug!("Using X-Forwarded-For header for remote address: {ip}");
        }
    }
    if use_forwarded && result.is_none() {
        trace!("Checking Forwarded header");
        result = req.headers().get("Forwarded").and_then(|v| v.to_str().ok()).and_then(parse_forwarded_for);
        if let Some(ip) = result {
            debug!("Using Forwarded header for remote address: {ip}");
        }
    }
    result.or_else(|| {
        let peer_addr = req.connection_info().peer_addr().map(|a| a.to_string());
        trace!("Using Peer address for remote address: {:?}", peer_addr);
        peer_addr.and_then(|s| IpAddr::from_str(&s).ok())
    })
}

/// Checks a webhook caller against the IP whitelist. Without a whitelist, every peer is allowed. With one, a request
/// whose address cannot be determined is refused.
pub fn peer_is_whitelisted(peer_ip: Option<IpAddr>, whitelist: Option<&[IpAddr]>) -> bool {
    match (peer_ip, whitelist) {
        (Some(ip), Some(whitelist)) => {
            info!("💻️ FareHarbor webhook from {ip}");
            whitelist.contains(&ip)
        },
        (_, None) => true,
        (None, Some(_)) => {
            warn!("💻️ No IP address found in webhook request, denying access.");
            false
        },
    }
}

fn parse_forwarded_for(header: &str) -> Option<IpAddr> {
    let re = Regex::new(r#"for="?(?P<ip>[^;,"]+)"?"#).ok()?;
    re.captures(header).and_then(|caps| caps.name("ip")).and_then(|m| IpAddr::from_str(m.as_str()).ok())
}

/// Calculates the hex-encoded HMAC-SHA256 of `data`. The key is the hex decoding of `secret`.
pub fn calculate_hmac(secret: &str, data: &[u8]) -> Result<String, hex::FromHexError> {
    let key = hex::decode(secret.trim())?;
    let mut mac = HmacSha256::new_from_slice(&key).map_err(|_| hex::FromHexError::InvalidStringLength)?;
    mac.update(data);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Checks a hex-encoded signature against the HMAC-SHA256 of `data` in constant time.
///
/// Returns false if either the secret or the signature is not valid hex.
pub fn verify_hmac(secret: &str, data: &[u8], signature: &str) -> bool {
    let Ok(key) = hex::decode(secret.trim()) else {
        return false;
    };
    let Ok(signature) = hex::decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(&key) else {
        return false;
    };
    mac.update(data);
    mac.verify_slice(&signature).is_ok()
}

#[cfg(test)]
mod test {
    use super::*;

    const SECRET: &str = "6b6f6b6f6d6f";

    #[test]
    fn hmac_round_trip() {
        let sig = calculate_hmac(SECRET, b"{\"booking\":{}}").unwrap();
        assert_eq!(sig.len(), 64);
        assert!(verify_hmac(SECRET, b"{\"booking\":{}}", &sig));
        assert!(verify_hmac(SECRET, b"{\"booking\":{}}", &sig.to_uppercase()));
        assert!(!verify_hmac(SECRET, b"{\"booking\":{ }}", &sig));
        assert!(!verify_hmac(SECRET, b"{\"booking\":{}}", "not hex"));
    }

    #[test]
    fn known_digest() {
        // RFC 4231, test case 2
        let key = hex::encode("Jefe");
        let sig = calculate_hmac(&key, b"what do ya want for nothing?").unwrap();
        assert_eq!(sig, "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843");
    }

    #[test]
    fn secret_must_be_hex() {
        assert!(calculate_hmac("kokomo", b"data").is_err());
        assert!(!verify_hmac("kokomo", b"data", "00"));
    }

    #[test]
    fn forwarded_header() {
        assert_eq!(parse_forwarded_for("for=192.0.2.60;proto=http"), Some("192.0.2.60".parse().unwrap()));
        assert_eq!(parse_forwarded_for("for=\"10.1.1.1\""), Some("10.1.1.1".parse().unwrap()));
        assert_eq!(parse_forwarded_for("proto=https"), None);
    }

    #[test]
    fn whitelist_checks() {
        let allowed: Vec<IpAddr> = vec!["10.0.0.1".parse().unwrap(), "::1".parse().unwrap()];
        let peer = |s: &str| Some(IpAddr::from_str(s).unwrap());
        assert!(peer_is_whitelisted(peer("10.0.0.1"), Some(allowed.as_slice())));
        assert!(peer_is_whitelisted(peer("::1"), Some(allowed.as_slice())));
        assert!(!peer_is_whitelisted(peer("10.0.0.2"), Some(allowed.as_slice())));
        assert!(!peer_is_whitelisted(None, Some(allowed.as_slice())));
        assert!(peer_is_whitelisted(peer("192.168.1.20"), None));
        assert!(peer_is_whitelisted(None, None));
    }
}
