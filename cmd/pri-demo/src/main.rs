//! Back-to-back PRI demo
//!
//! Wires a NETWORK and a CPE controller together over a SEQPACKET
//! socketpair (each datagram plays one HDLC frame, the kernel plays the
//! framer) and walks a complete call: bring-up, SETUP, ALERTING,
//! CONNECT, DISCONNECT, RELEASE.

use std::os::unix::io::RawFd;
use std::time::Duration;

use qpri::{CallRef, FdIo, Pri, PriEvent, Role, SetupRequest, TransferCap};

fn socketpair() -> (RawFd, RawFd) {
    let mut fds = [0i32; 2];
    let res = unsafe {
        libc::socketpair(
            libc::AF_UNIX,
            libc::SOCK_SEQPACKET | libc::SOCK_NONBLOCK | libc::SOCK_CLOEXEC,
            0,
            fds.as_mut_ptr(),
        )
    };
    if res != 0 {
        panic!("socketpair failed: {}", std::io::Error::last_os_error());
    }
    (fds[0], fds[1])
}

/// Drain every pending event from one controller.
fn pump(pri: &mut Pri<FdIo>, events: &mut Vec<PriEvent>) {
    loop {
        match pri.run(false) {
            Ok(Some(ev)) => events.push(ev),
            Ok(None) => break,
            Err(e) => {
                eprintln!("pump error: {}", e);
                break;
            }
        }
    }
    if let Some(ev) = pri.schedule_run() {
        events.push(ev);
    }
}

fn main() {
    println!("=== qpri Back-to-Back Demo ===\n");

    let (net_fd, cpe_fd) = socketpair();
    let mut net = Pri::new(FdIo::owning(net_fd), Role::Network, qpri::Dialect::Ni2);
    let mut cpe = Pri::new(FdIo::owning(cpe_fd), Role::Cpe, qpri::Dialect::Ni2);

    let mut net_up = false;
    let mut cpe_up = false;
    let mut placed = false;
    let mut cpe_cref: Option<CallRef> = None;
    let mut done = false;

    for _ in 0..5000 {
        if done {
            break;
        }

        let mut net_events = Vec::new();
        let mut cpe_events = Vec::new();
        pump(&mut net, &mut net_events);
        pump(&mut cpe, &mut cpe_events);

        for ev in net_events {
            println!("[network] {}", ev);
            match ev {
                PriEvent::DchanUp => net_up = true,
                PriEvent::Ring(r) => {
                    println!(
                        "[network] incoming call {} -> {} on channel {:?}",
                        r.calling, r.called, r.channel
                    );
                    net.acknowledge(r.cref, r.channel, false).expect("acknowledge");
                    net.answer(r.cref, r.channel, false).expect("answer");
                }
                PriEvent::Hangup { cref, cause, .. } => {
                    println!(
                        "[network] call {} cleared (cause {:?}); demo complete",
                        cref, cause
                    );
                    done = true;
                }
                _ => {}
            }
        }

        for ev in cpe_events {
            println!("[cpe] {}", ev);
            match ev {
                PriEvent::DchanUp => cpe_up = true,
                PriEvent::Ringing { .. } => {}
                PriEvent::Answer { cref, .. } => {
                    println!("[cpe] call answered, hanging up");
                    cpe.hangup(cref, None).expect("hangup");
                }
                _ => {}
            }
        }

        if net_up && cpe_up && !placed {
            placed = true;
            let cref = cpe.new_call();
            let req = SetupRequest::new(1, "100")
                .capability(TransferCap::Speech)
                .exclusive(true)
                .caller("15551234", 0x21, 0x00)
                .called_plan(0x21);
            println!("[cpe] placing call on channel 1 (cref {})", cref);
            cpe.setup(cref, &req).expect("setup");
            cpe_cref = Some(cref);
        }

        std::thread::sleep(Duration::from_millis(1));
    }

    if !done {
        eprintln!("demo did not complete; cref was {:?}", cpe_cref);
        std::process::exit(1);
    }
    println!("\nnetwork stats: {:?}", net.stats());
    println!("cpe stats:     {:?}", cpe.stats());
}
