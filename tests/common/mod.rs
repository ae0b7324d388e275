#![allow(dead_code)]

use cable_crawler::CrawlerConfig;

/// Config whose 1977 search starts at `start_url`, with all retry delays off.
pub fn test_config(start_url: &str) -> CrawlerConfig {
    CrawlerConfig::from_toml_str(&format!(
        r#"
[http]
user_agent = "cable-crawler-tests/1.0"
server_error_delay_ms = 0
refresh_delay_ms = 0
download_retry_delay_ms = 0

[years]
1977 = "{}"
"#,
        start_url
    ))
    .unwrap()
}

/// AAD-style result page. Each row is `(document href, draft date, document number)`.
pub fn results_page(rows: &[(&str, &str, &str)], next_href: Option<&str>) -> String {
    let body: String = rows
        .iter()
        .enumerate()
        .map(|(i, (href, date, number))| {
            format!(
                r#"<tr>
  <td><a href="{href}">View Record</a></td>
  <td>{date}</td>
  <td>{number}</td>
  <td>D77009{i}-0001</td>
  <td>SECSTATE WASHDC</td>
  <td>SUBJECT  OF   CABLE {i}</td>
  <td>PFOR, OVIP</td>
  <td>AMEMBASSY LONDON</td>
  <td>{i}</td>
</tr>"#
            )
        })
        .collect();
    let pager = next_href
        .map(|href| format!(r#"<a href="{}"><b>Next</b></a>"#, href))
        .unwrap_or_default();

    format!(
        r#"<html>
<head><title>AAD: Display Partial Records</title></head>
<body>
<table id="queryResults">
<thead><tr><th>View</th><th>Draft Date</th><th>Document Number</th><th>Film Number</th><th>From</th><th>Subject</th><th>TAGS</th><th>To</th><th></th></tr></thead>
<tbody>
{}
</tbody>
</table>
<p class="pager">{}</p>
</body>
</html>"#,
        body, pager
    )
}
