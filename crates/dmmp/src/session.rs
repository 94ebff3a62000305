use std::io::{Read, Write};

use dmmp_frame::{FrameReader, FrameWriter};
use dmmp_transport::{IpcStream, SocketAddress};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::Result;

/// One connection to multipathd, good for exactly one command.
///
/// [`Session::exec`] consumes the session; the socket is closed when it
/// returns, whatever the outcome.
pub struct Session {
    address: SocketAddress,
    reader: FrameReader<IpcStream>,
    writer: FrameWriter<IpcStream>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Connect to multipathd with the configured address and timeout.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let stream = dmmp_transport::connect(&config.address, Some(config.timeout))?;
        if let Some((uid, gid, pid)) = stream.peer_credentials() {
            debug!(address = %config.address, uid, gid, pid, "multipathd peer credentials");
        }

        let reader_stream = stream.try_clone()?;
        let frame_config = config.frame_config();
        let reader = FrameReader::with_config_ipc(reader_stream, frame_config.clone())?;
        let writer = FrameWriter::with_config_ipc(stream, frame_config)?;

        Ok(Self {
            address: config.address.clone(),
            reader,
            writer,
        })
    }

    /// Address this session is connected to.
    pub fn address(&self) -> &SocketAddress {
        &self.address
    }

    /// Send `command` and return multipathd's reply text.
    ///
    /// A peer that hangs up without replying yields an empty string.
    pub fn exec(mut self, command: &str) -> Result<String> {
        debug!(address = %self.address, command, "sending multipathd command");
        exchange(&mut self.reader, &mut self.writer, command)
    }
}

/// Run one request/response exchange over an already framed stream.
pub(crate) fn exchange<R: Read, W: Write>(
    reader: &mut FrameReader<R>,
    writer: &mut FrameWriter<W>,
    command: &str,
) -> Result<String> {
    writer.send_command(command)?;

    let Some(payload) = reader.read_frame()? else {
        debug!("multipathd closed the connection without replying");
        return Ok(String::new());
    };

    let mut reply = String::from_utf8(payload.to_vec())?;
    let len = reply.trim_end_matches('\0').len();
    reply.truncate(len);
    debug!(len, "received multipathd reply");
    Ok(reply)
}
