use bacsim_device::{CandidateAddress, SimError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Shown before the interactive address prompt.
pub const ADDRESS_ADVICE: &str = "Advice: Choose the IP address that matches your active network \
interface (e.g., eth0, WiFi, or the one in the same subnet as your BACnet clients/YABE). Avoid \
addresses starting with 127. or 10.255.255.";

/// One `[index] address (interface)` line per candidate.
pub fn render_candidates(candidates: &[CandidateAddress]) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| format!("  [{idx}] {} ({})\n", c.address, c.interface))
        .collect()
}

pub fn selection_prompt(len: usize) -> String {
    format!(
        "Select the IP address to use for BACnet (0-{}): ",
        len.saturating_sub(1)
    )
}

/// Line printed before exiting on a bad address choice.
pub fn selection_failure(err: &SimError) -> String {
    format!("{err}. Exiting.")
}

/// Reads one line of operator input. End of input yields an empty choice,
/// which selection then rejects.
pub async fn read_choice<R>(reader: &mut R) -> std::io::Result<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    reader.read_line(&mut line).await?;
    Ok(line.trim().to_string())
}
