//! Deterministic fixture payloads for stress runs.
//!
//! Six structured binary records shaped like serialized user-profile
//! messages: tagged, length-prefixed fields with long shared URL prefixes.
//! The shared prefixes give the match finder realistic material, and the
//! generation is seed-driven so every run sees byte-identical payloads.

const TAG_USER_ID: u8 = 0x01;
const TAG_EMAIL: u8 = 0x02;
const TAG_NAME: u8 = 0x03;
const TAG_ROLE: u8 = 0x04;
const TAG_PICTURE_URL: u8 = 0x05;
const TAG_EMPLOYEE: u8 = 0x06;

fn push_field(buf: &mut Vec<u8>, tag: u8, value: &[u8]) {
    buf.push(tag);
    buf.extend_from_slice(&(value.len() as u16).to_le_bytes());
    buf.extend_from_slice(value);
}

/// Next 32-hex-char identifier from the LCG stream.
fn hex_id(rng: &mut u64) -> String {
    let mut s = String::with_capacity(32);
    for _ in 0..8 {
        *rng = rng
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        s.push_str(&format!("{:04x}", (*rng >> 48) as u16));
    }
    s
}

fn profile_url(id: &str) -> String {
    format!("http://localhost:8080/external/azure/profile/{id}/image")
}

struct Profile<'a> {
    id: &'a str,
    email: Option<&'a str>,
    name: Option<&'a str>,
    roles: &'a [&'a str],
    employee: bool,
}

fn record(profiles: &[Profile<'_>]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.push(profiles.len() as u8);
    for p in profiles {
        push_field(&mut buf, TAG_USER_ID, p.id.as_bytes());
        if let Some(email) = p.email {
            push_field(&mut buf, TAG_EMAIL, email.as_bytes());
        }
        if let Some(name) = p.name {
            push_field(&mut buf, TAG_NAME, name.as_bytes());
        }
        for role in p.roles {
            push_field(&mut buf, TAG_ROLE, role.as_bytes());
        }
        push_field(&mut buf, TAG_PICTURE_URL, profile_url(p.id).as_bytes());
        push_field(&mut buf, TAG_EMPLOYEE, &[p.employee as u8]);
    }
    buf
}

/// The six payloads every stress worker round-trips.
pub fn fixture_payloads() -> Vec<Vec<u8>> {
    let mut rng = 0x5EED_CAFE_F00Du64;
    let ids: Vec<String> = (0..6).map(|_| hex_id(&mut rng)).collect();

    vec![
        // Bare profiles: one id plus its picture URL.
        record(&[Profile {
            id: &ids[0],
            email: None,
            name: None,
            roles: &[],
            employee: false,
        }]),
        record(&[Profile {
            id: &ids[1],
            email: None,
            name: None,
            roles: &[],
            employee: false,
        }]),
        // Multi-user directory listing: heavy shared-prefix repetition.
        record(&[
            Profile {
                id: &ids[0],
                email: Some("example1@tpa-group.test"),
                name: Some("Bau Max"),
                roles: &["write", "read"],
                employee: true,
            },
            Profile {
                id: &ids[1],
                email: Some("some-owner@tpa-group.test"),
                name: Some("Owner of Company"),
                roles: &["owner"],
                employee: true,
            },
            Profile {
                id: &ids[2],
                email: None,
                name: Some("Members of Some Group Company"),
                roles: &["read"],
                employee: false,
            },
        ]),
        record(&[Profile {
            id: &ids[3],
            email: None,
            name: None,
            roles: &[],
            employee: false,
        }]),
        record(&[Profile {
            id: &ids[4],
            email: None,
            name: None,
            roles: &[],
            employee: false,
        }]),
        record(&[
            Profile {
                id: &ids[3],
                email: Some("ext_port1@tpa-group.test"),
                name: Some("Some Guy"),
                roles: &["write"],
                employee: true,
            },
            Profile {
                id: &ids[5],
                email: Some("someUser@example.test"),
                name: Some("Some User with Permission"),
                roles: &["write"],
                employee: true,
            },
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_are_deterministic_and_distinct() {
        let a = fixture_payloads();
        let b = fixture_payloads();
        assert_eq!(a, b);
        assert_eq!(a.len(), 6);
        for (i, payload) in a.iter().enumerate() {
            assert!(!payload.is_empty());
            for other in &a[i + 1..] {
                assert_ne!(payload, other);
            }
        }
    }
}
