use reef_core::{RoomId, SessionId};
use reef_wire::PacketId;

/// Narrow interface an external transport implements to actually push
/// bytes to a socket. The controller never touches a socket or a framework
/// type directly — it only ever produces [`Outbound`] values and leaves
/// delivery to whatever implements this trait.
pub trait Broadcaster {
    fn send(&mut self, session_id: SessionId, packet_id: PacketId, payload: Vec<u8>);
    fn broadcast(&mut self, room_id: RoomId, packet_id: PacketId, payload: Vec<u8>);
}

/// One outbound packet the controller wants delivered, either to a single
/// session or to every member of a room.
#[derive(Debug, Clone)]
pub enum Outbound {
    Unicast {
        session_id: SessionId,
        packet_id: PacketId,
        payload: Vec<u8>,
    },
    Broadcast {
        room_id: RoomId,
        packet_id: PacketId,
        payload: Vec<u8>,
    },
}

/// Drains a batch of controller output into a concrete [`Broadcaster`].
pub fn flush(outbound: Vec<Outbound>, sink: &mut impl Broadcaster) {
    for item in outbound {
        match item {
            Outbound::Unicast {
                session_id,
                packet_id,
                payload,
            } => sink.send(session_id, packet_id, payload),
            Outbound::Broadcast {
                room_id,
                packet_id,
                payload,
            } => sink.broadcast(room_id, packet_id, payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        unicasts: Vec<(SessionId, PacketId)>,
        broadcasts: Vec<(RoomId, PacketId)>,
    }

    impl Broadcaster for RecordingSink {
        fn send(&mut self, session_id: SessionId, packet_id: PacketId, _payload: Vec<u8>) {
            self.unicasts.push((session_id, packet_id));
        }
        fn broadcast(&mut self, room_id: RoomId, packet_id: PacketId, _payload: Vec<u8>) {
            self.broadcasts.push((room_id, packet_id));
        }
    }

    #[test]
    fn flush_routes_each_variant_to_the_right_method() {
        let session_id = SessionId::default();
        let room_id = RoomId::default();
        let batch = vec![
            Outbound::Unicast {
                session_id,
                packet_id: PacketId::HitResult,
                payload: vec![],
            },
            Outbound::Broadcast {
                room_id,
                packet_id: PacketId::FishDeath,
                payload: vec![],
            },
        ];
        let mut sink = RecordingSink::default();
        flush(batch, &mut sink);
        assert_eq!(sink.unicasts, vec![(session_id, PacketId::HitResult)]);
        assert_eq!(sink.broadcasts, vec![(room_id, PacketId::FishDeath)]);
    }
}
