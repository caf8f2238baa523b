use url::{form_urlencoded, Url};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{self, PriceFormat};
use crate::models::Property;
use crate::view::outbox::Effect;

const MESSAGE_APP_URL: &str = "https://wa.me/";

/// Where a listing gets shared. There is no fallback between channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareChannel {
    /// Message-app deep link with the text prefilled
    WhatsApp,
    Email,
    Clipboard,
}

/// Detail page link carrying the listing id and the `shared` marker
pub fn share_link(config: &Config, property_id: &str) -> Result<Url> {
    let invalid = |err: url::ParseError| Error::Validation(format!("Invalid site URL: {}", err));

    let mut site = Url::parse(&config.site_url).map_err(invalid)?;
    // join replaces the last segment unless the base ends in '/'
    if !site.path().ends_with('/') {
        let prefixed = format!("{}/", site.path());
        site.set_path(&prefixed);
    }
    let mut url = site
        .join(config.property_path.trim_start_matches('/'))
        .map_err(invalid)?;

    url.query_pairs_mut()
        .clear()
        .append_pair("id", property_id)
        .append_pair("shared", "true");
    Ok(url)
}

/// Percent-encode for use inside a URL query, spaces as `%20`
fn encode_component(text: &str) -> String {
    // byte_serialize writes spaces as '+' and escapes a literal '+'
    form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

pub fn message_app_link(message: &str) -> String {
    format!("{}?text={}", MESSAGE_APP_URL, encode_component(message))
}

pub fn email_link(subject: &str, body: &str) -> String {
    format!(
        "mailto:?subject={}&body={}",
        encode_component(subject),
        encode_component(body)
    )
}

/// Effect that hands the listing to `channel`
pub fn share_effect(
    channel: ShareChannel,
    property: &Property,
    link: &Url,
    price_format: &PriceFormat,
) -> Effect {
    let message = format::share_message(property, link.as_str(), price_format);

    match channel {
        ShareChannel::WhatsApp => Effect::OpenUrl(message_app_link(&message)),
        ShareChannel::Email => {
            let subject = format!("Check out this property: {}", format::title_text(property));
            Effect::OpenUrl(email_link(&subject, &message))
        }
        ShareChannel::Clipboard => Effect::CopyToClipboard(link.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing() -> Property {
        Property::from_json(
            "baner-2bhk",
            json!({"name": "Sunny 2BHK", "listingType": "rent", "price": 20000}),
        )
        .unwrap()
    }

    #[test]
    fn link_embeds_id_and_marker() {
        let link = share_link(&Config::default(), "baner 2bhk").unwrap();
        assert_eq!(
            link.as_str(),
            "https://estatehub.example/property?id=baner+2bhk&shared=true"
        );
    }

    #[test]
    fn link_keeps_site_path_prefix() {
        for site_url in ["https://host.example/app/", "https://host.example/app"] {
            let config = Config {
                site_url: site_url.into(),
                ..Config::default()
            };
            let link = share_link(&config, "p1").unwrap();
            assert_eq!(
                link.as_str(),
                "https://host.example/app/property?id=p1&shared=true"
            );
        }
    }

    #[test]
    fn bad_site_url_is_rejected() {
        let config = Config {
            site_url: "not a url".into(),
            ..Config::default()
        };
        assert!(matches!(
            share_link(&config, "p1"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn encodes_message_text() {
        assert_eq!(
            message_app_link("Rs. 20000/month & more+"),
            "https://wa.me/?text=Rs.%2020000%2Fmonth%20%26%20more%2B"
        );
    }

    #[test]
    fn each_channel_has_its_own_effect() {
        let property = listing();
        let link = share_link(&Config::default(), property.id()).unwrap();
        let format = PriceFormat::default();

        match share_effect(ShareChannel::WhatsApp, &property, &link, &format) {
            Effect::OpenUrl(url) => {
                assert!(url.starts_with("https://wa.me/?text=Check%20out%20this%20property"));
                assert!(url.contains("shared%3Dtrue"));
            }
            other => panic!("unexpected effect {:?}", other),
        }

        match share_effect(ShareChannel::Email, &property, &link, &format) {
            Effect::OpenUrl(url) => {
                assert!(url.starts_with("mailto:?subject=Check%20out%20this%20property%3A%20Sunny%202BHK&body="));
            }
            other => panic!("unexpected effect {:?}", other),
        }

        assert_eq!(
            share_effect(ShareChannel::Clipboard, &property, &link, &format),
            Effect::CopyToClipboard(
                "https://estatehub.example/property?id=baner-2bhk&shared=true".to_string()
            )
        );
    }
}
