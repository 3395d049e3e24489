//! Data access: the BlockCypher API client and the sync history store

pub mod blockcypher;
pub mod db;
