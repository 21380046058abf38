// local address discovery for the startup banner

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// address of the interface used for outbound traffic, if any.
/// connecting a udp socket only selects a route; nothing is sent.
pub fn local_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(192, 0, 2, 1), 9)).ok()?;
    let ip = socket.local_addr().ok()?.ip();

    (!ip.is_unspecified()).then_some(ip)
}

/// display form used in logs
pub fn local_ip_display() -> String {
    local_ip()
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "UNKNOWN".to_string())
}
