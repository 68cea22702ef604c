// src/main.rs
use chess_duel::config::{self, Config, Startup, DEFAULT_CONFIG_FILENAME};
use chess_duel::error::{CommandError, MoveError};
use chess_duel::game::{format_history, GameState, GameStatus, MoveOutcome};
use chess_duel::input::{parse_user_input, Command, UserInput};
use chess_duel::protocol::WireMove;
use chess_duel::relay::{self, HostHandle, PeerEvent, PeerLink};
use std::env;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{channel, Sender};
use std::thread;

/// Everything the owner thread reacts to, in arrival order.
enum Event {
    Local(String),
    InputClosed,
    Peer(PeerEvent),
}

impl From<PeerEvent> for Event {
    fn from(e: PeerEvent) -> Self { Event::Peer(e) }
}

enum Flow { Continue, Quit }

/// Owns the authoritative game; the only place moves are applied.
struct Session {
    game: GameState,
    config: Config,
    link: Option<PeerLink>,
    /// Listener waiting for a peer, if hosting.
    hosting: Option<HostHandle>,
    events: Sender<Event>,
}

impl Session {
    fn new(config: Config, events: Sender<Event>) -> Self {
        Session { game: GameState::new(), config, link: None, hosting: None, events }
    }

    fn handle_line(&mut self, line: &str) -> Result<Flow, CommandError> {
        if line.trim().is_empty() { return Ok(Flow::Continue); }
        match parse_user_input(line)? {
            UserInput::Move(mv) => self.local_move(mv),
            UserInput::Command(command) => return self.command(command),
        }
        Ok(Flow::Continue)
    }

    fn command(&mut self, command: Command) -> Result<Flow, CommandError> {
        match command {
            Command::Board => println!("{}", self.game),
            Command::History(as_json) => {
                if self.game.history().is_empty() {
                    println!("No moves yet.");
                } else if as_json {
                    for record in self.game.history() {
                        match serde_json::to_string(record) {
                            Ok(line) => println!("{}", line),
                            Err(e) => eprintln!("Error: could not serialize move {}: {}", record, e),
                        }
                    }
                } else {
                    print!("{}", format_history(self.game.history()));
                }
            }
            Command::Status => println!("Status: {}", self.game.status()),
            Command::Reset => {
                self.game.reset();
                self.disconnect();
                println!("New game started.");
                println!("{}", self.game);
            }
            Command::Host(port) => {
                if self.link.is_some() || self.hosting.is_some() {
                    return Err(CommandError::InvalidArgument("already hosting or connected; use 'disconnect' first".to_string()));
                }
                let port = port.unwrap_or(self.config.port);
                let listener = relay::host(port, self.events.clone())?;
                println!("Server is listening on port {}. Share your IP address and this port with your opponent.", listener.local_addr().port());
                self.hosting = Some(listener);
            }
            Command::Join(addr, port) => {
                if self.link.is_some() || self.hosting.is_some() {
                    return Err(CommandError::InvalidArgument("already hosting or connected; use 'disconnect' first".to_string()));
                }
                let addr = addr.unwrap_or_else(|| self.config.host.clone());
                let port = port.unwrap_or(self.config.port);
                let link = relay::join(&addr, port, self.events.clone())?;
                println!("Connected to server at {}", link.peer_addr());
                self.link = Some(link);
            }
            Command::Disconnect => {
                if self.link.is_none() && self.hosting.is_none() {
                    println!("Not connected.");
                } else {
                    self.disconnect();
                    println!("Disconnected. Playing locally.");
                }
            }
            Command::Help => print_help(),
            Command::Quit => {
                println!("Quit command received. Exiting game.");
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    fn local_move(&mut self, mv: WireMove) {
        match self.game.move_piece(mv.from_col, mv.from_row, mv.to_col, mv.to_row) {
            MoveOutcome::Accepted(record) => {
                println!("{} played {}", record.player, record);
                if let Some(link) = self.link.as_mut() {
                    if let Err(e) = link.send(&mv) {
                        eprintln!("Error: {}. Continuing as a local game.", e);
                        self.disconnect();
                    }
                }
                self.after_move();
            }
            MoveOutcome::Rejected(reason) => {
                let err = MoveError { from: (mv.from_col, mv.from_row), to: (mv.to_col, mv.to_row), reason };
                println!("Error making move: {}", err);
            }
        }
    }

    fn handle_peer(&mut self, event: PeerEvent) {
        match event {
            PeerEvent::Connected(link) => {
                if self.hosting.take().is_none() {
                    link.close(); // Hosting was cancelled before the peer arrived
                    return;
                }
                println!("\nConnected from {}", link.peer_addr());
                self.link = Some(link);
            }
            PeerEvent::Move(mv) => {
                if self.config.echo_remote {
                    println!("\nchess move received: {}", mv);
                }
                match self.game.move_piece(mv.from_col, mv.from_row, mv.to_col, mv.to_row) {
                    MoveOutcome::Accepted(record) => {
                        println!("{} played {}", record.player, record);
                        self.after_move();
                    }
                    MoveOutcome::Rejected(reason) => eprintln!("Warning: peer move {} ignored: {}", mv, reason),
                }
            }
            PeerEvent::Malformed(e) => eprintln!("Warning: {}", e),
            PeerEvent::Closed => {
                if self.link.take().is_some() {
                    println!("\nPeer disconnected. Playing locally.");
                }
            }
            PeerEvent::Failed(e) => {
                eprintln!("\nError: {}", e);
                self.hosting = None;
            }
        }
    }

    fn after_move(&self) {
        if self.config.show_board {
            println!("{}", self.game.board());
        }
        match self.game.status() {
            GameStatus::Checkmate { winner } => {
                println!("\n=== GAME OVER: {} wins by checkmate. ===", winner);
                println!("Type 'reset' to start a new game.");
            }
            GameStatus::Stalemate => {
                println!("\n=== GAME OVER: Draw by stalemate. ===");
                println!("Type 'reset' to start a new game.");
            }
            GameStatus::Check(player) => println!("{} is in check!", player),
            GameStatus::Ongoing => {}
        }
    }

    fn disconnect(&mut self) {
        if let Some(link) = self.link.take() {
            link.close();
        }
        if let Some(listener) = self.hosting.take() {
            listener.cancel();
        }
    }
}

fn spawn_stdin_reader(events: Sender<Event>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if events.send(Event::Local(line)).is_err() { return; }
                }
                Err(e) => {
                    eprintln!("Error reading input: {}", e);
                    break;
                }
            }
        }
        let _ = events.send(Event::InputClosed);
    });
}

fn prompt(game: &GameState) -> io::Result<()> {
    print!("\n{}'s turn. Enter move (e.g. e2e4 or 4,1,4,3) or command: ", game.side_to_move());
    io::stdout().flush()
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = match config::parse_args(env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            return Err(e.into());
        }
    };
    if cli.help {
        print_usage();
        return Ok(());
    }

    let mut config = Config::load_or_default(cli.config_path.as_deref()).unwrap_or_else(|e| {
        eprintln!("Warning: {}. Using default settings.", e);
        Config::default()
    });
    cli.apply(&mut config);

    let (events, inbox) = channel::<Event>();
    spawn_stdin_reader(events.clone());
    let mut session = Session::new(config, events);

    println!("==============================");
    println!("|        Chess Duel          |");
    println!("==============================");
    print_help();

    let startup = match &cli.startup {
        Startup::Local => None,
        Startup::Host => Some(Command::Host(None)),
        Startup::Join(_) => Some(Command::Join(None, None)),
    };
    if let Some(command) = startup {
        if let Err(e) = session.command(command) {
            eprintln!("Error: {}", e);
        }
    }

    println!("{}", session.game);
    prompt(&session.game)?;

    'game_loop: for event in inbox.iter() {
        match event {
            Event::Local(line) => match session.handle_line(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break 'game_loop,
                Err(e) => println!("Input Error: {}", e),
            },
            Event::InputClosed => {
                println!("\nEnd of input detected. Quitting game.");
                break 'game_loop;
            }
            Event::Peer(event) => session.handle_peer(event),
        }
        prompt(&session.game)?;
    }

    session.disconnect();
    println!("\nGame session finished.");
    Ok(())
}

fn print_usage() {
    println!("Usage: chess_duel [--config <file>] [--host | --join <address>] [--port <n>]");
    println!("  --config, -c <file>  JSON settings file (default: {} if present)", DEFAULT_CONFIG_FILENAME);
    println!("  --host               Wait for an opponent to join");
    println!("  --join, -j <addr>    Connect to a hosting opponent");
    println!("  --port, -p <n>       Port to host on or connect to");
}

/// Prints available commands.
fn print_help() {
    println!("\nAvailable Commands:");
    println!("  <move>              fromCol,fromRow,toCol,toRow (0-7) or squares like e2e4.");
    println!("                      Castle by moving the king two columns; pawns promote to queens.");
    println!("  board               Show the board.");
    println!("  history [json]      Show the moves played so far (optionally as JSON lines).");
    println!("  status              Show check / checkmate / stalemate status.");
    println!("  reset               Start a new game (also drops any connection).");
    println!("  host [port]         Host a network game.");
    println!("  join [addr] [port]  Join a hosted network game.");
    println!("  disconnect          Drop the network connection.");
    println!("  help                Show this help message.");
    println!("  quit / exit         Exit the game.");
    println!();
}
