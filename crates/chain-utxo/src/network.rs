use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UtxoError;

/// Address, key and peer parameters for one network of a coin.
///
/// Mirrors the `networks.js` table each bitcore fork carries: version bytes
/// for base58check payloads, BIP-32 magics, and the p2p identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub name: String,
    pub alias: String,
    /// Version byte of P2PKH addresses.
    pub pubkeyhash: u8,
    /// Version byte of WIF private keys.
    pub privatekey: u8,
    /// Version byte of P2SH addresses.
    pub scripthash: u8,
    pub xpubkey: u32,
    pub xprivkey: u32,
    #[serde(default)]
    pub network_magic: Option<u32>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub dns_seeds: Vec<String>,
}

impl NetworkParams {
    /// Case-insensitive match against the network name or its alias.
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) || self.alias.eq_ignore_ascii_case(name)
    }

    /// Network magic as the four message-start bytes (big-endian).
    pub fn magic_bytes(&self) -> Option<[u8; 4]> {
        self.network_magic.map(u32::to_be_bytes)
    }

    pub fn is_livenet(&self) -> bool {
        self.matches("livenet")
    }
}

#[allow(clippy::too_many_arguments)]
fn params(
    name: &str,
    alias: &str,
    pubkeyhash: u8,
    privatekey: u8,
    scripthash: u8,
    xpubkey: u32,
    xprivkey: u32,
    network_magic: Option<u32>,
    port: Option<u16>,
    dns_seeds: &[&str],
) -> NetworkParams {
    NetworkParams {
        name: name.to_string(),
        alias: alias.to_string(),
        pubkeyhash,
        privatekey,
        scripthash,
        xpubkey,
        xprivkey,
        network_magic,
        port,
        dns_seeds: dns_seeds.iter().map(|s| s.to_string()).collect(),
    }
}

/// Find a network by name or alias within a coin's network list.
pub fn find_network<'a>(networks: &'a [NetworkParams], name: &str) -> Option<&'a NetworkParams> {
    networks.iter().find(|n| n.matches(name))
}

/// Coins with built-in network parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoinNetwork {
    Doge,
    Pep,
    Flop,
    Gemma,
    Bbq,
    Lky,
    Trmp,
    Xbt,
}

impl CoinNetwork {
    pub const ALL: [CoinNetwork; 8] = [
        CoinNetwork::Doge,
        CoinNetwork::Pep,
        CoinNetwork::Flop,
        CoinNetwork::Gemma,
        CoinNetwork::Bbq,
        CoinNetwork::Lky,
        CoinNetwork::Trmp,
        CoinNetwork::Xbt,
    ];

    pub fn ticker(self) -> &'static str {
        match self {
            CoinNetwork::Doge => "DOGE",
            CoinNetwork::Pep => "PEP",
            CoinNetwork::Flop => "FLOP",
            CoinNetwork::Gemma => "GEMMA",
            CoinNetwork::Bbq => "BBQ",
            CoinNetwork::Lky => "LKY",
            CoinNetwork::Trmp => "TRMP",
            CoinNetwork::Xbt => "XBT",
        }
    }

    /// Every network known for this coin, livenet first.
    pub fn networks(self) -> Vec<NetworkParams> {
        match self {
            CoinNetwork::Doge => vec![
                params(
                    "livenet",
                    "mainnet",
                    0x1e,
                    0x9e,
                    0x16,
                    0x02facafd,
                    0x02fac398,
                    Some(0xc0c0c0c0),
                    Some(22556),
                    &["seed.multidoge.org", "seed2.multidoge.org"],
                ),
                params(
                    "testnet",
                    "test",
                    0x71,
                    0xf1,
                    0xc4,
                    0x043587cf,
                    0x04358394,
                    Some(0xfcc1b7dc),
                    Some(44556),
                    &["testseed.jrn.me.uk"],
                ),
            ],
            // Pubkey-hash version taken from live PEP addresses ('P');
            // the remaining bytes follow the Dogecoin lineage.
            CoinNetwork::Pep => vec![params(
                "livenet", "mainnet", 0x38, 0x9e, 0x16, 0x02facafd, 0x02fac398, None, None, &[],
            )],
            CoinNetwork::Flop => vec![params(
                "livenet", "mainnet", 0x23, 0x9e, 0x16, 0x02facafd, 0x02fac398, None, None, &[],
            )],
            CoinNetwork::Gemma => vec![
                params(
                    "livenet",
                    "mainnet",
                    0x26,
                    0x80,
                    0x62,
                    0x0488b21e,
                    0x0488ade4,
                    Some(0x47454d53),
                    Some(4682),
                    &["seed1.gemmacoin.io", "seed2.gemmacoin.io", "seed3.gemmacoin.io"],
                ),
                params(
                    "testnet",
                    "test",
                    0x6f,
                    0xef,
                    0xc4,
                    0x043587cf,
                    0x04358394,
                    Some(0x4b3a1f37),
                    Some(18333),
                    &[],
                ),
            ],
            CoinNetwork::Bbq => vec![
                params(
                    "livenet",
                    "mainnet",
                    0x55,
                    0xd5,
                    0x06,
                    0x0487b01f,
                    0x0487afe5,
                    Some(0xfde4d942),
                    Some(19323),
                    &[
                        "seed01.bbqcoin.link",
                        "seed02.bbqcoin.link",
                        "seed03.bbqcoin.link",
                    ],
                ),
                params(
                    "testnet",
                    "test",
                    0x19,
                    0x99,
                    0x4c,
                    0x02facafd,
                    0x02fac398,
                    Some(0xfcc1b7dc),
                    Some(19333),
                    &[
                        "testnet.seed01.bbqcoin.link",
                        "testnet.seed02.bbqcoin.link",
                        "testnet.seed03.bbqcoin.link",
                    ],
                ),
                params(
                    "regtest",
                    "dev",
                    0x2f,
                    0x99,
                    0x05,
                    0x02facafd,
                    0x02fac398,
                    Some(0xc0c0c0c0),
                    Some(19333),
                    &[],
                ),
            ],
            CoinNetwork::Lky => vec![
                params(
                    "livenet",
                    "mainnet",
                    47,
                    176,
                    5,
                    0x0488b21e,
                    0x0488ade4,
                    Some(0xfbc0b6db),
                    Some(9917),
                    &["dnsseed.luckycoinfoundation.org"],
                ),
                params(
                    "testnet",
                    "test",
                    47,
                    153,
                    5,
                    0x02facafd,
                    0x02fac398,
                    Some(0xfcc1b7dc),
                    Some(19917),
                    &[],
                ),
                params(
                    "regtest",
                    "dev",
                    47,
                    153,
                    5,
                    0x02facafd,
                    0x02fac398,
                    Some(0xc0c0c0c0),
                    Some(19917),
                    &[],
                ),
            ],
            CoinNetwork::Trmp => vec![
                params(
                    "livenet",
                    "mainnet",
                    0x41,
                    0x97,
                    0x1c,
                    0x02fadafe,
                    0x02fac495,
                    Some(0x54524d50),
                    Some(33884),
                    &["dnsseed.trumpow.meme"],
                ),
                params(
                    "testnet",
                    "test",
                    0x71,
                    0xf1,
                    0xc4,
                    0x043587cf,
                    0x04358394,
                    Some(0x54524d50),
                    Some(44884),
                    &[],
                ),
                params(
                    "regtest",
                    "dev",
                    0x6f,
                    0xef,
                    0xc4,
                    0x043587cf,
                    0x04358394,
                    Some(0x54524d50),
                    Some(16329),
                    &[],
                ),
            ],
            CoinNetwork::Xbt => vec![params(
                "livenet", "mainnet", 0x00, 0x80, 0x05, 0x0488b21e, 0x0488ade4, None, None, &[],
            )],
        }
    }

    pub fn livenet(self) -> NetworkParams {
        // networks() always lists livenet first.
        self.networks().swap_remove(0)
    }

    /// Look up a network of this coin by name or alias.
    pub fn get(self, name: &str) -> Result<NetworkParams, UtxoError> {
        self.networks()
            .into_iter()
            .find(|n| n.matches(name))
            .ok_or_else(|| UtxoError::UnknownNetwork(format!("{} has no network '{name}'", self.ticker())))
    }
}

impl FromStr for CoinNetwork {
    type Err = UtxoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoinNetwork::ALL
            .into_iter()
            .find(|c| c.ticker().eq_ignore_ascii_case(s))
            .ok_or_else(|| UtxoError::UnknownNetwork(format!("unsupported coin: {s}")))
    }
}

impl fmt::Display for CoinNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ticker())
    }
}
