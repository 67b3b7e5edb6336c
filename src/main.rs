use mahjong_client::{app, error};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        error!("mode not specified");
        return;
    }

    let args2 = args[2..].to_vec();
    match args[1].as_str() {
        "C" => {
            // Client (サーバに接続してプレイ/観戦)
            app::ClientApp::new(args2).run();
        }
        "R" => {
            // Replay (受信メッセージの記録を再生)
            app::ReplayApp::new(args2).run();
        }
        m => {
            error!("unknown mode: {}", m)
        }
    }
}
