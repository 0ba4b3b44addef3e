use std::collections::HashMap;
use std::net::IpAddr;

use lookup_enrich::execution::StreamProcessor;
use lookup_enrich::processing::{DnsResolver, Enricher, LookupSource, NameService};
use lookup_enrich::rule::MappingRule;
use lookup_enrich::types::{RecordOutcome, ResolutionResult};

/// In-memory name service standing in for a real resolver.
#[derive(Default)]
struct StaticNames {
    forward: HashMap<String, IpAddr>,
    reverse: HashMap<IpAddr, String>,
}

impl StaticNames {
    fn sample() -> Self {
        let mut names = Self::default();
        names
            .forward
            .insert("dns.google".to_string(), "8.8.8.8".parse().unwrap());
        names
            .forward
            .insert("ipv6.example".to_string(), "2001:db8::1".parse().unwrap());
        names
            .reverse
            .insert("8.8.8.8".parse().unwrap(), "dns.google.".to_string());
        names
            .reverse
            .insert("2001:db8::1".parse().unwrap(), "ipv6.example.".to_string());
        names
    }
}

impl NameService for StaticNames {
    fn lookup_ip(&self, host: &str) -> Option<IpAddr> {
        self.forward.get(host).copied()
    }

    fn reverse_lookup(&self, addr: IpAddr) -> Option<String> {
        self.reverse.get(&addr).cloned()
    }
}

fn dns_processor(rule: &str) -> StreamProcessor {
    let rule = MappingRule::parse(rule).unwrap();
    let source = LookupSource::Dns(DnsResolver::with_service(StaticNames::sample()));
    StreamProcessor::new(Enricher::new(rule, source))
}

fn run(processor: &StreamProcessor, input: &str) -> String {
    let mut out = Vec::new();
    processor.process(input.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn resolver_shapes_forward_and_reverse_results() {
    let r = DnsResolver::with_service(StaticNames::sample());
    assert_eq!(r.resolve("dns.google"), Some(ResolutionResult::Ip("8.8.8.8".parse().unwrap())));
    assert_eq!(
        r.resolve("2001:db8::1"),
        Some(ResolutionResult::Hostname("ipv6.example".to_string()))
    );
    assert_eq!(r.resolve("unresolvable.invalid"), None);
}

#[test]
fn reverse_lookup_adds_hostname() {
    let p = dns_processor("client_ip as ip OUTPUT hostname");
    let out = run(&p, "{\"client_ip\":\"8.8.8.8\"}\n{\"client_ip\":\"192.0.2.1\"}\n");
    assert_eq!(
        out,
        "{\"client_ip\":\"8.8.8.8\",\"hostname\":\"dns.google\"}\n{\"client_ip\":\"192.0.2.1\"}\n"
    );
}

#[test]
fn forward_lookup_adds_ip_under_renamed_field() {
    let p = dns_processor("host as ip OUTPUT ip as resolved_ip");
    let out = run(&p, "{\"host\":\"ipv6.example\"}\n");
    assert_eq!(out, "{\"host\":\"ipv6.example\",\"resolved_ip\":\"2001:db8::1\"}\n");
}

#[test]
fn output_clause_can_filter_out_dns_result() {
    // Reverse results are keyed `hostname`, which this rule does not select.
    let p = dns_processor("client_ip as ip OUTPUT ip");
    let out = run(&p, "{\"client_ip\":\"8.8.8.8\"}\n");
    assert_eq!(out, "{\"client_ip\":\"8.8.8.8\"}\n");
}

#[test]
fn keep_all_dns_result_in_array_mode() {
    let p = dns_processor("host as ip");
    let out = run(&p, r#"[{"host":"dns.google"},{"host":"nowhere.invalid"},{"host":7}]"#);
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(
        v,
        serde_json::json!([
            {"host": "dns.google", "ip": "8.8.8.8"},
            {"host": "nowhere.invalid"},
            {"host": 7}
        ])
    );
}

#[test]
fn dns_outcomes_are_reported() {
    let rule = MappingRule::parse("host as ip").unwrap();
    let e = Enricher::new(rule, LookupSource::Dns(DnsResolver::with_service(StaticNames::sample())));

    let rec = |v: serde_json::Value| v.as_object().unwrap().clone();
    assert_eq!(e.enrich(&rec(serde_json::json!({"host": "dns.google"}))).outcome, RecordOutcome::Enriched);
    assert_eq!(e.enrich(&rec(serde_json::json!({"host": "x.invalid"}))).outcome, RecordOutcome::Unmatched);
    assert_eq!(e.enrich(&rec(serde_json::json!({"other": 1}))).outcome, RecordOutcome::PassedThrough);
}
