use hickory_proto::op::{Message, MessageType, ResponseCode};

/// Reply skeleton echoing the request's id, opcode, RD flag and question.
fn reply_to(request: &Message, rcode: ResponseCode) -> Message {
    let mut reply = Message::new(request.id(), MessageType::Response, request.op_code());
    reply.set_recursion_desired(request.recursion_desired());
    reply.set_recursion_available(true);
    reply.set_response_code(rcode);
    reply.add_queries(request.queries().iter().cloned());
    reply
}

/// Authoritative NOERROR reply with an empty answer section.
pub fn empty_authoritative(request: &Message) -> Message {
    let mut reply = reply_to(request, ResponseCode::NoError);
    reply.set_authoritative(true);
    reply
}

pub fn server_failure(request: &Message) -> Message {
    reply_to(request, ResponseCode::ServFail)
}
