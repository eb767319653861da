//! A raw Layer-2 Ethernet socket bound to one interface (spec §4.1
//! "Startup", §5 "Resource ownership").
//!
//! `AF_PACKET`/`SOCK_RAW` sockets require the caller to supply the whole
//! Ethernet frame, including the header — that is what [`crate::wire`]
//! builds. Interface index and hardware address are queried once at open
//! time via the classic `SIOCGIFINDEX`/`SIOCGIFHWADDR` ioctls; these are
//! "bad" (non-self-describing) ioctl numbers, hence `ioctl_read_bad!`.

use std::mem::{size_of, zeroed};
use std::os::unix::io::{AsRawFd, RawFd};

use sign_core::{Result, SignError};
use socket2::{Domain, Protocol, Socket, Type};

/// Mirrors `struct ifreq` from `<net/if.h>` closely enough to extract an
/// interface index or hardware address; the real struct is a C union we
/// don't need to model in full.
#[repr(C)]
struct IfReq {
    ifr_name: [libc::c_char; libc::IFNAMSIZ],
    ifr_union: IfReqUnion,
}

#[repr(C)]
union IfReqUnion {
    ifindex: libc::c_int,
    hwaddr: libc::sockaddr,
    _pad: [u8; 24],
}

impl IfReq {
    fn for_name(name: &str) -> Result<Self> {
        if name.len() >= libc::IFNAMSIZ {
            return Err(SignError::Configuration(format!("interface name '{name}' too long")));
        }
        let mut ifr_name = [0 as libc::c_char; libc::IFNAMSIZ];
        for (dst, src) in ifr_name.iter_mut().zip(name.bytes()) {
            *dst = src as libc::c_char;
        }
        Ok(Self { ifr_name, ifr_union: IfReqUnion { _pad: [0u8; 24] } })
    }
}

nix::ioctl_read_bad!(siocgifindex, libc::SIOCGIFINDEX, IfReq);
nix::ioctl_read_bad!(siocgifhwaddr, libc::SIOCGIFHWADDR, IfReq);

fn htons(value: u16) -> u16 {
    value.to_be()
}

/// Anything that can emit a complete Ethernet frame tagged with an
/// EtherType. [`RawEthernetSocket`] is the production implementation;
/// tests substitute an in-memory recorder so the row/commit emission
/// order (spec §8 Testable Property 1) can be checked without a real NIC.
pub trait FrameSink {
    /// # Errors
    /// Implementations surface send failures as [`SignError::Transport`];
    /// per spec §4.1 "Failure semantics" callers log and continue.
    fn send_frame(&self, ethertype: u16, frame: &[u8]) -> Result<()>;
}

/// An open, interface-bound raw Ethernet socket.
pub struct RawEthernetSocket {
    socket: Socket,
    ifindex: libc::c_int,
    /// Hardware address of the bound interface, read at open time.
    pub src_mac: [u8; 6],
}

impl RawEthernetSocket {
    /// Opens a raw packet socket and resolves `interface`'s index and
    /// hardware address (spec §4.1 "Startup").
    ///
    /// # Errors
    /// Returns [`SignError::Configuration`] if the interface cannot be
    /// resolved, or [`SignError::Transport`] if socket creation fails —
    /// both are treated as unrecoverable startup failures (spec §7).
    pub fn open(interface: &str) -> Result<Self> {
        let protocol = Protocol::from(i32::from(htons(libc::ETH_P_ALL as u16)));
        let socket = Socket::new(Domain::from(libc::AF_PACKET), Type::RAW, Some(protocol))
            .map_err(|err| SignError::Transport(format!("opening raw socket: {err}")))?;

        let fd = socket.as_raw_fd();
        let ifindex = Self::resolve_ifindex(fd, interface)?;
        let src_mac = Self::resolve_hwaddr(fd, interface)?;

        Ok(Self { socket, ifindex, src_mac })
    }

    fn resolve_ifindex(fd: RawFd, interface: &str) -> Result<libc::c_int> {
        let mut ifr = IfReq::for_name(interface)?;
        unsafe { siocgifindex(fd, &mut ifr) }
            .map_err(|err| SignError::Configuration(format!("SIOCGIFINDEX({interface}): {err}")))?;
        Ok(unsafe { ifr.ifr_union.ifindex })
    }

    fn resolve_hwaddr(fd: RawFd, interface: &str) -> Result<[u8; 6]> {
        let mut ifr = IfReq::for_name(interface)?;
        unsafe { siocgifhwaddr(fd, &mut ifr) }
            .map_err(|err| SignError::Configuration(format!("SIOCGIFHWADDR({interface}): {err}")))?;
        let sa = unsafe { ifr.ifr_union.hwaddr };
        let mut mac = [0u8; 6];
        for (dst, src) in mac.iter_mut().zip(sa.sa_data.iter()) {
            *dst = *src as u8;
        }
        Ok(mac)
    }

    /// Sends `frame` (a complete Ethernet frame built by [`crate::wire`])
    /// addressed to the fixed FPGA destination MAC, tagged with
    /// `ethertype` at the packet-socket level.
    ///
    /// # Errors
    /// Returns [`SignError::Transport`] if the kernel `sendto` call fails;
    /// per spec §4.1 "Failure semantics" ("`send` returning `< 0`: log and
    /// continue") callers should log this and move on to the next tick
    /// rather than treat it as fatal.
    pub fn send_frame(&self, ethertype: u16, frame: &[u8]) -> Result<()> {
        let mut addr: libc::sockaddr_ll = unsafe { zeroed() };
        addr.sll_family = libc::AF_PACKET as u16;
        addr.sll_protocol = htons(ethertype);
        addr.sll_ifindex = self.ifindex;
        addr.sll_halen = 6;
        addr.sll_addr[..6].copy_from_slice(&crate::wire::DEST_MAC);

        let ret = unsafe {
            libc::sendto(
                self.socket.as_raw_fd(),
                frame.as_ptr().cast(),
                frame.len(),
                0,
                std::ptr::addr_of!(addr).cast(),
                size_of::<libc::sockaddr_ll>() as libc::socklen_t,
            )
        };

        if ret < 0 {
            return Err(SignError::Transport(std::io::Error::last_os_error().to_string()));
        }
        Ok(())
    }
}

impl FrameSink for RawEthernetSocket {
    fn send_frame(&self, ethertype: u16, frame: &[u8]) -> Result<()> {
        RawEthernetSocket::send_frame(self, ethertype, frame)
    }
}
