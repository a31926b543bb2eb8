use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::process::exit;

use dnspacket::client::Error;
use dnspacket::{
    Class, Client, Flags, Inet, Inet6, Message, Name, Query, ResourceRecord, Response, Type,
    DNS_PORT,
};

fn hexdump(data: &[u8]) -> String {
    const WIDTH: usize = 8;

    let mut out = String::new();
    for (row, chunk) in data.chunks(WIDTH).enumerate() {
        if row != 0 {
            out.push('\n');
        }
        for i in 0..WIDTH {
            match chunk.get(i) {
                Some(byte) => out.push_str(&format!("{:02x} ", byte)),
                None => out.push_str("   "),
            }
        }
        out.push('|');
        for i in 0..WIDTH {
            out.push(match chunk.get(i) {
                Some(&byte) if byte.is_ascii_graphic() || byte == b' ' => byte as char,
                _ => ' ',
            });
        }
        out.push('|');
    }
    out
}

fn print_records(section: &str, records: &[ResourceRecord]) {
    for rr in records {
        println!("{}:", section);
        println!("\tNAME:  {}", rr.name);
        println!("\tTYPE:  {}", rr.typ());
        println!("\tCLASS: {}", rr.cls);
        println!("\tTTL:   {}", rr.ttl);
        println!("\tDATA:  {}", rr.data);
    }
}

fn print_message(message: &Message) {
    let flags = message.flags();
    println!("ID: {:#06x}", message.id());
    println!("FLAGS:");
    if flags.is_response() {
        println!("\tRESPONSE {}", flags.response_code());
    } else {
        println!("\tQUERY {}", flags.opcode());
    }
    if flags.is_authoritative() {
        println!("\tAuthoritative Answer");
    }
    if flags.is_truncated() {
        println!("\tTruncated");
    }
    if flags.is_recursion_desired() {
        println!("\tRecursion Desired");
    }
    if flags.is_recursion_available() {
        println!("\tRecursion Available");
    }
    for query in message.queries() {
        println!("QD:");
        println!("\tNAME:  {}", query.qname);
        println!("\tTYPE:  {}", query.qtype);
        println!("\tCLASS: {}", query.qclass);
    }
    print_records("AN", message.answers());
    print_records("NS", message.authorities());
    print_records("AR", message.additionals());
}

pub fn main() {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters("dnspacket=debug");
    builder.init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args.len() > 2 {
        eprintln!("Usage: query HOST [SERVER]");
        exit(1);
    }

    let server: IpAddr = match args.get(1) {
        Some(server) => match server.parse() {
            Ok(server) => server,
            Err(err) => {
                eprintln!("Bad DNS server IP address: {}", err);
                exit(1);
            }
        },
        None => {
            println!("No server provided, defaulting to: 8.8.8.8.");
            Ipv4Addr::new(8, 8, 8, 8).into()
        }
    };
    let server = SocketAddr::new(server, DNS_PORT);

    let name = match Name::new(args[0].as_str()) {
        Ok(name) => name,
        Err(err) => {
            eprintln!("Bad domain name: {}", err);
            exit(1);
        }
    };

    let mut message = Message::new();
    message.set_flags(Flags::RD);
    message.add_query(Query::new(name, Type::A, Class::IN));

    let request = match message.to_bytes() {
        Ok(request) => request,
        Err(err) => {
            eprintln!("Could not encode query: {}", err);
            exit(1);
        }
    };
    println!("Sending message to: {}", server);
    println!("{}", hexdump(&request));
    print_message(&message);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Could not start runtime: {}", err);
            exit(1);
        }
    };

    let response: Result<Response, Error> = runtime.block_on(async {
        if server.is_ipv4() {
            Client::<Inet>::new(server)?.exchange(&message).await
        } else {
            Client::<Inet6>::new(server)?.exchange(&message).await
        }
    });

    match response {
        Ok(response) => {
            println!("Message received from: {}", server);
            println!("{}", hexdump(&response.datagram));
            print_message(&response.message);
        }
        Err(err) => {
            eprintln!("Exchange failed: {}", err);
            exit(1);
        }
    }
}
