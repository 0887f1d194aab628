//! Prologix GPIB-USB controller setup.
//!
//! The controller sits between the serial port and the GPIB bus. Commands
//! starting with `++` are consumed by the controller itself and never reach
//! the instrument; they are LF-terminated (unlike instrument traffic, which
//! uses CR-LF). These are one-shot writes with no reply, issued on the raw
//! channel before any framing begins.

use super::ByteChannel;
use crate::error::AppResult;
use log::info;

/// Puts the controller in CONTROLLER mode, addresses the instrument at
/// `gpib_address`, and enables auto-read after addressing so query replies
/// come back without an explicit `++read`.
pub async fn configure<C: ByteChannel>(channel: &mut C, gpib_address: u8) -> AppResult<()> {
    info!("Configuring Prologix controller for GPIB address {gpib_address}");
    channel.write(b"++mode 1\n").await?;
    channel
        .write(format!("++addr {gpib_address}\n").as_bytes())
        .await?;
    channel.write(b"++auto 1\n").await?;
    Ok(())
}

/// Asserts the GPIB interface-clear line, resetting bus state on all devices.
pub async fn interface_clear<C: ByteChannel>(channel: &mut C) -> AppResult<()> {
    info!("Asserting GPIB interface clear");
    channel.write(b"++ifc\n").await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockChannel;

    #[tokio::test]
    async fn configure_writes_the_three_controller_commands() {
        let mut channel = MockChannel::new();
        configure(&mut channel, 5).await.unwrap();
        assert_eq!(
            channel.written(),
            vec![
                "++mode 1\n".to_string(),
                "++addr 5\n".to_string(),
                "++auto 1\n".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn interface_clear_is_a_single_write() {
        let mut channel = MockChannel::new();
        interface_clear(&mut channel).await.unwrap();
        assert_eq!(channel.written(), vec!["++ifc\n".to_string()]);
    }
}
