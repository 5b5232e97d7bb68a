use std::sync::Weak;

use tokio::select;
use tokio::sync::{mpsc, watch};

use crate::Actor;
use crate::mailbox::{BoxMessage, Mailbox};

pub async fn run_actor<S: Send + 'static>(
    mailbox: Weak<Mailbox<S>>,
    mut state: S,
    mut msg_rx: mpsc::UnboundedReceiver<Box<dyn BoxMessage<S>>>,
    mut stop_rx: watch::Receiver<bool>,
) {
    debug!("started");
    let mut handled: u64 = 0;
    loop {
        let msg = select! {
            biased;

            _ = stop_rx.changed() => {
                debug!("stop requested");
                break;
            }
            msg = msg_rx.recv() => {
                let Some(msg) = msg else {
                    break;
                };
                msg
            }
        };
        trace!("received message: {msg:?}");

        // Every strong handle may be gone while messages from weak handles
        // are still queued. Nobody can observe their effects anymore.
        let Some(mailbox) = mailbox.upgrade() else {
            debug!("all handles have been dropped, discard the message");
            break;
        };

        trace_span!("proc msg", seq = handled).in_scope(|| {
            msg.handle_box(&mut state, &Actor::from_mailbox(mailbox));
        });
        handled += 1;
    }
    debug!("will terminate after {handled} messages");
}
