#[cfg(unix)]
fn main() -> std::io::Result<()> {
    use lightshim_rs::config::{self, Root};
    use lightshim_rs::listener::{self, ListenerMessage};
    use lightshim_rs::logging;
    use lightshim_rs::wire::Message;

    let config_root = match std::env::args().nth(1) {
        Some(path) => config::read_config(path)?,
        None => Root::default(),
    };
    logging::init(&config_root.log_level);

    listener::serve(&config_root, |message| match message {
        ListenerMessage::Received { source, message } => match message {
            Message::Document(doc) => {
                log::info!("[{:?}] snapshot from {}", source, doc.game);
                match doc.to_json_pretty() {
                    Ok(pretty) => log::debug!("{}", pretty),
                    Err(err) => log::warn!("{}", err),
                }
            }
            Message::Line(line) => log::info!("[{:?}] {}", source, line),
        },
    })
}

#[cfg(not(unix))]
fn main() {
    eprintln!("lightsink only runs on Unix hosts");
}
