// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Status page templates.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use mifi_gps_proto::format::{Axis, format_dms, format_gps, hemisphere};

use crate::error::RenderError;
use crate::fix_store::FixSnapshot;

/// Everything a template may show.
#[derive(Clone, Copy, Debug)]
pub struct StatusView<'a> {
    /// Snapshot of the fix store taken for this request.
    pub fix: &'a FixSnapshot,
    /// Maps API key, if configured.
    pub maps_api_key: Option<&'a str>,
    /// When the page is being rendered.
    pub rendered_at: DateTime<Utc>,
}

impl StatusView<'_> {
    /// Best known `(latitude, longitude)`: RMC first, then GGA.
    pub fn position(&self) -> Option<(f64, f64)> {
        let from_rmc = self
            .fix
            .rmc
            .as_ref()
            .and_then(|r| r.latitude.zip(r.longitude));
        let from_gga = || {
            self.fix
                .gga
                .as_ref()
                .and_then(|g| g.latitude.zip(g.longitude))
        };
        from_rmc.or_else(from_gga)
    }

    /// Link to a map centred on the current position.
    ///
    /// Uses the embed API when a key is configured, a plain search link
    /// otherwise.
    pub fn map_link(&self) -> Option<String> {
        let (lat, lon) = self.position()?;
        Some(match self.maps_api_key {
            Some(key) => format!(
                "https://www.google.com/maps/embed/v1/place?key={key}&q={lat:.6},{lon:.6}"
            ),
            None => format!("https://www.google.com/maps/search/?api=1&query={lat:.6},{lon:.6}"),
        })
    }
}

/// Renders a [`StatusView`] into a response body.
pub trait StatusTemplate: Send + Sync {
    /// MIME type of the rendered body.
    fn content_type(&self) -> &'static str {
        "text/html; charset=utf-8"
    }

    /// Produce the page.
    fn render(&self, view: &StatusView<'_>) -> Result<String, RenderError>;
}

/// The built-in HTML status page.
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlStatusTemplate;

impl StatusTemplate for HtmlStatusTemplate {
    fn render(&self, view: &StatusView<'_>) -> Result<String, RenderError> {
        let mut html = String::with_capacity(4096);
        html.push_str(PAGE_HEAD);

        if view.fix.is_empty() {
            html.push_str("<p class=\"stale\">No current fix. Waiting for the GPS stream.</p>\n");
        }

        if let Some((lat, lon)) = view.position() {
            writeln!(html, "<h2>Position</h2>\n<table>")?;
            row(
                &mut html,
                "Latitude",
                &format!(
                    "{lat:.6} ({} {}, {})",
                    format_gps(lat),
                    hemisphere(lat, Axis::Latitude),
                    format_dms(lat)
                ),
            )?;
            row(
                &mut html,
                "Longitude",
                &format!(
                    "{lon:.6} ({} {}, {})",
                    format_gps(lon),
                    hemisphere(lon, Axis::Longitude),
                    format_dms(lon)
                ),
            )?;
            if let Some(alt) = view.fix.gga.as_ref().and_then(|g| g.altitude) {
                row(&mut html, "Altitude", &format!("{alt:.1} m"))?;
            }
            writeln!(html, "</table>")?;
            if let Some(link) = view.map_link() {
                writeln!(
                    html,
                    "<p><a href=\"{}\">Open map</a></p>",
                    escape_html(&link)
                )?;
            }
        }

        if let Some(rmc) = &view.fix.rmc {
            writeln!(html, "<h2>Motion</h2>\n<table>")?;
            row(&mut html, "Status", if rmc.valid { "valid" } else { "void" })?;
            if let (Some(date), Some(time)) = (rmc.date, rmc.time) {
                row(&mut html, "Device time", &format!("{date} {time} UTC"))?;
            }
            if let Some(speed) = rmc.speed {
                row(&mut html, "Speed", &format!("{speed:.1} kn"))?;
            }
            if let Some(course) = rmc.course {
                row(&mut html, "Course", &format!("{course:.1}°"))?;
            }
            writeln!(html, "</table>")?;
        }

        if let Some(vtg) = &view.fix.vtg {
            if let Some(kph) = vtg.ground_speed_kph {
                writeln!(html, "<p>Ground speed: {kph:.1} km/h</p>")?;
            }
        }

        if view.fix.gga.is_some() || view.fix.gsa.is_some() {
            writeln!(html, "<h2>Fix quality</h2>\n<table>")?;
            if let Some(gga) = &view.fix.gga {
                row(&mut html, "Quality", &gga.quality.to_string())?;
                if let Some(n) = gga.satellites {
                    row(&mut html, "Satellites used", &n.to_string())?;
                }
            }
            if let Some(gsa) = &view.fix.gsa {
                let dop = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"));
                row(&mut html, "Fix type", &format!("{:?}", gsa.fix_type))?;
                row(
                    &mut html,
                    "DOP (P/H/V)",
                    &format!("{} / {} / {}", dop(gsa.pdop), dop(gsa.hdop), dop(gsa.vdop)),
                )?;
            }
            writeln!(html, "</table>")?;
        }

        if let Some(gsv) = &view.fix.gsv {
            writeln!(
                html,
                "<h2>Satellites in view: {}</h2>\n<table>\n<tr><th>PRN</th><th>Elevation</th><th>Azimuth</th><th>SNR</th></tr>",
                gsv.satellites_in_view
            )?;
            let opt = |v: Option<u16>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
            for sat in &gsv.satellites {
                writeln!(
                    html,
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    sat.prn,
                    opt(sat.elevation.map(u16::from)),
                    opt(sat.azimuth),
                    opt(sat.snr.map(u16::from))
                )?;
            }
            writeln!(html, "</table>")?;
        }

        writeln!(
            html,
            "<footer>Rendered {}</footer>\n</body>\n</html>",
            view.rendered_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        Ok(html)
    }
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<meta http-equiv="refresh" content="30">
<title>MiFi GPS</title>
<style>
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 2em; }
table { border-collapse: collapse; }
td, th { padding: 0.2em 1em 0.2em 0; text-align: left; }
.stale { color: #b45309; }
footer { margin-top: 2em; color: #666; font-size: 0.9em; }
</style>
</head>
<body>
<h1>MiFi GPS</h1>
"#;

fn row(html: &mut String, label: &str, value: &str) -> Result<(), RenderError> {
    writeln!(
        html,
        "<tr><th>{}</th><td>{}</td></tr>",
        escape_html(label),
        escape_html(value)
    )?;
    Ok(())
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mifi_gps_proto::fragment::{FixQuality, Gga, Rmc};

    fn view<'a>(fix: &'a FixSnapshot, key: Option<&'a str>) -> StatusView<'a> {
        StatusView {
            fix,
            maps_api_key: key,
            rendered_at: Utc.with_ymd_and_hms(2024, 6, 15, 10, 31, 0).unwrap(),
        }
    }

    fn located() -> FixSnapshot {
        FixSnapshot {
            rmc: Some(Rmc {
                valid: true,
                latitude: Some(48.1173),
                longitude: Some(-11.5),
                speed: Some(3.0),
                ..Default::default()
            }),
            gga: Some(Gga {
                time: None,
                latitude: Some(1.0),
                longitude: Some(2.0),
                quality: FixQuality::Gps,
                satellites: Some(8),
                hdop: None,
                altitude: Some(12.5),
                separation: None,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_position_prefers_rmc() {
        let fix = located();
        assert_eq!(view(&fix, None).position(), Some((48.1173, -11.5)));

        let gga_only = FixSnapshot {
            rmc: None,
            ..located()
        };
        assert_eq!(view(&gga_only, None).position(), Some((1.0, 2.0)));
        assert_eq!(view(&FixSnapshot::default(), None).position(), None);
    }

    #[test]
    fn test_map_link() {
        let fix = located();
        assert_eq!(
            view(&fix, None).map_link().unwrap(),
            "https://www.google.com/maps/search/?api=1&query=48.117300,-11.500000"
        );
        assert_eq!(
            view(&fix, Some("k3y")).map_link().unwrap(),
            "https://www.google.com/maps/embed/v1/place?key=k3y&q=48.117300,-11.500000"
        );
    }

    #[test]
    fn test_render_located_page() {
        let fix = located();
        let html = HtmlStatusTemplate.render(&view(&fix, None)).unwrap();
        assert!(html.contains("4807.0380 N"));
        assert!(html.contains("1130.0000 W"));
        assert!(html.contains("12.5 m"));
        assert!(html.contains("query=48.117300,-11.500000"));
        assert!(html.contains("&amp;query="));
        assert!(!html.contains("No current fix"));
    }

    #[test]
    fn test_render_empty_page() {
        let html = HtmlStatusTemplate
            .render(&view(&FixSnapshot::default(), None))
            .unwrap();
        assert!(html.contains("No current fix"));
        assert!(html.contains("Rendered 2024-06-15 10:31:00 UTC"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
