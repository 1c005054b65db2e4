//! Stream proxy configuration rendering.

use std::fmt::Write;

use crate::sync::ServerEndpoint;

/// Render one TCP and one UDP `server {}` block per endpoint, in input order.
///
/// Output depends only on `servers`; an empty list renders an empty file.
pub fn render(servers: &[ServerEndpoint]) -> String {
    let stanzas: Vec<String> = servers
        .iter()
        .flat_map(|server| [stanza(server, ""), stanza(server, " udp")])
        .collect();

    stanzas.join("\n")
}

fn stanza(server: &ServerEndpoint, protocol: &str) -> String {
    let mut block = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(block, "server {{");
    let _ = writeln!(block, "    listen {}{} reuseport;", server.gateway_port, protocol);
    let _ = writeln!(block, "    proxy_pass {}:{};", server.ip, server.vpn_port);
    let _ = writeln!(block, "}}");
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(ip: &str, vpn_port: u16, gateway_port: u16) -> ServerEndpoint {
        ServerEndpoint {
            ip: ip.to_string(),
            vpn_port,
            gateway_port,
        }
    }

    #[test]
    fn test_single_server_exact_output() {
        let text = render(&[endpoint("1.2.3.4", 443, 8443)]);
        assert_eq!(
            text,
            "server {\n    listen 8443 reuseport;\n    proxy_pass 1.2.3.4:443;\n}\n\
             \n\
             server {\n    listen 8443 udp reuseport;\n    proxy_pass 1.2.3.4:443;\n}\n"
        );
    }

    #[test]
    fn test_empty_list_renders_nothing() {
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn test_order_preserved() {
        let servers = [
            endpoint("10.0.0.2", 1194, 9002),
            endpoint("10.0.0.1", 1194, 9001),
        ];
        let text = render(&servers);

        let second = text.find("proxy_pass 10.0.0.2:1194").unwrap();
        let first = text.find("proxy_pass 10.0.0.1:1194").unwrap();
        assert!(second < first);
        assert_eq!(text.matches("server {").count(), 4);
    }

    #[test]
    fn test_deterministic() {
        let servers = [endpoint("1.2.3.4", 443, 8443), endpoint("5.6.7.8", 80, 8080)];
        assert_eq!(render(&servers), render(&servers));
    }
}
